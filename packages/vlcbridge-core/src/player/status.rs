//! Status document patching.
//!
//! The player's status document is relayed with one extra child appended to
//! its root element, `<allowshutdown>1</allowshutdown>`, which tells remote
//! control clients that the host can be shut down through the bridge.
//!
//! Only the root element is re-serialized. Anything outside it (XML
//! declaration, doctype, comments, processing instructions, whitespace) is
//! dropped, the same as re-serializing a parsed element tree would.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::protocol_constants::{ALLOW_SHUTDOWN_ELEMENT, ALLOW_SHUTDOWN_VALUE};

/// Errors raised while patching the status document.
#[derive(Debug, Error)]
pub enum StatusDocumentError {
    /// The body is not well-formed XML.
    #[error("Malformed status document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing the patched document failed.
    #[error("Failed to write status document: {0}")]
    Write(#[from] std::io::Error),

    /// The body contains no root element.
    #[error("Status document has no root element")]
    MissingRoot,

    /// The body ended before the root element was closed.
    #[error("Status document root element is not closed")]
    UnclosedRoot,

    /// Content other than whitespace, comments or processing instructions
    /// appears outside the root element.
    #[error("Unexpected content outside the status document root")]
    ContentOutsideRoot,
}

/// Convenient Result alias for status document operations.
pub type StatusDocumentResult<T> = Result<T, StatusDocumentError>;

/// Appends the `allowshutdown` capability element as the last child of the
/// document root and returns the re-serialized document.
pub fn append_allow_shutdown(body: &[u8]) -> StatusDocumentResult<Vec<u8>> {
    let mut reader = Reader::from_reader(body);
    let mut writer = Writer::new(Vec::with_capacity(body.len() + 32));
    let mut buf = Vec::new();

    let mut depth: usize = 0;
    let mut root_done = false;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,

            Event::Start(start) => {
                if root_done {
                    return Err(StatusDocumentError::ContentOutsideRoot);
                }
                depth += 1;
                writer.write_event(Event::Start(start))?;
            }

            Event::End(end) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(StatusDocumentError::ContentOutsideRoot)?;
                if depth == 0 {
                    write_capability(&mut writer)?;
                    root_done = true;
                }
                writer.write_event(Event::End(end))?;
            }

            Event::Empty(empty) if depth == 0 => {
                if root_done {
                    return Err(StatusDocumentError::ContentOutsideRoot);
                }
                expand_empty_root(&mut writer, &empty)?;
                root_done = true;
            }

            Event::Text(text) if depth == 0 => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(StatusDocumentError::ContentOutsideRoot);
                }
            }

            Event::CData(_) | Event::GeneralRef(_) if depth == 0 => {
                return Err(StatusDocumentError::ContentOutsideRoot);
            }

            // Prolog and epilog markup is not part of the element tree.
            Event::Decl(_) | Event::DocType(_) | Event::PI(_) | Event::Comment(_)
                if depth == 0 => {}

            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(StatusDocumentError::UnclosedRoot);
    }
    if !root_done {
        return Err(StatusDocumentError::MissingRoot);
    }

    Ok(writer.into_inner())
}

fn write_capability(writer: &mut Writer<Vec<u8>>) -> StatusDocumentResult<()> {
    writer.write_event(Event::Start(BytesStart::new(ALLOW_SHUTDOWN_ELEMENT)))?;
    writer.write_event(Event::Text(BytesText::new(ALLOW_SHUTDOWN_VALUE)))?;
    writer.write_event(Event::End(BytesEnd::new(ALLOW_SHUTDOWN_ELEMENT)))?;
    Ok(())
}

/// Rewrites `<root/>` as `<root><allowshutdown>1</allowshutdown></root>`.
fn expand_empty_root(
    writer: &mut Writer<Vec<u8>>,
    root: &BytesStart<'_>,
) -> StatusDocumentResult<()> {
    writer.write_event(Event::Start(root.borrow()))?;
    write_capability(writer)?;
    writer.write_event(Event::End(root.to_end()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(xml: &str) -> String {
        let out = append_allow_shutdown(xml.as_bytes()).expect("should patch");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn appends_capability_as_last_root_child() {
        let xml = r#"<root><volume>256</volume><state>playing</state></root>"#;
        assert_eq!(
            patch(xml),
            "<root><volume>256</volume><state>playing</state><allowshutdown>1</allowshutdown></root>"
        );
    }

    #[test]
    fn drops_declaration_and_trailing_whitespace() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\" ?>\n<root>\n<fullscreen>0</fullscreen>\n</root>\n";
        assert_eq!(
            patch(xml),
            "<root>\n<fullscreen>0</fullscreen>\n<allowshutdown>1</allowshutdown></root>"
        );
    }

    #[test]
    fn nested_elements_named_like_root_do_not_close_early() {
        let xml = "<root><root>inner</root><information><category name=\"meta\"/></information></root>";
        let patched = patch(xml);
        assert!(patched.ends_with(
            "<category name=\"meta\"/></information><allowshutdown>1</allowshutdown></root>"
        ));
        assert_eq!(patched.matches("<allowshutdown>").count(), 1);
    }

    #[test]
    fn expands_self_closing_root() {
        assert_eq!(
            patch(r#"<root version="3"/>"#),
            r#"<root version="3"><allowshutdown>1</allowshutdown></root>"#
        );
    }

    #[test]
    fn preserves_escaped_text_inside_root() {
        let xml = "<root><title>Tom &amp; Jerry</title></root>";
        assert_eq!(
            patch(xml),
            "<root><title>Tom &amp; Jerry</title><allowshutdown>1</allowshutdown></root>"
        );
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = append_allow_shutdown(b"<root><a></b></root>").unwrap_err();
        assert!(matches!(err, StatusDocumentError::Xml(_)));
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = append_allow_shutdown(b"<root><a>1</a>").unwrap_err();
        assert!(matches!(err, StatusDocumentError::UnclosedRoot));
    }

    #[test]
    fn rejects_empty_body() {
        let err = append_allow_shutdown(b"").unwrap_err();
        assert!(matches!(err, StatusDocumentError::MissingRoot));
    }

    #[test]
    fn rejects_non_xml_body() {
        let err = append_allow_shutdown(b"File not found").unwrap_err();
        assert!(matches!(err, StatusDocumentError::ContentOutsideRoot));
    }

    #[test]
    fn rejects_second_root() {
        let err = append_allow_shutdown(b"<a/><b/>").unwrap_err();
        assert!(matches!(err, StatusDocumentError::ContentOutsideRoot));
    }
}
