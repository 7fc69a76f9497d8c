use std::fmt::Display;
use std::io::{self, Cursor};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::foundation::error::{CutError, CutResult};

pub(crate) type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Indented writer with the XML declaration and a bare `<!DOCTYPE root>` already written.
pub(crate) fn document_writer(doctype: &str) -> CutResult<XmlWriter> {
    let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(io_error)?;
    w.write_event(Event::DocType(BytesText::from_escaped(doctype)))
        .map_err(io_error)?;
    Ok(w)
}

pub(crate) fn finish(w: XmlWriter) -> CutResult<String> {
    let mut bytes = w.into_inner().into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| CutError::serde(format!("document is not utf-8: {e}")))
}

pub(crate) fn io_error(e: io::Error) -> CutError {
    CutError::serde(format!("xml write failed: {e}"))
}

/// `<name>text</name>`
pub(crate) fn text<W: io::Write>(w: &mut Writer<W>, name: &str, value: impl Display) -> io::Result<()> {
    w.create_element(name)
        .write_text_content(BytesText::new(&value.to_string()))?;
    Ok(())
}

/// XMEML boolean literal.
pub(crate) fn flag(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}
