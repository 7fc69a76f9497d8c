//! Timeline document emitters.
//!
//! [`EditorKind`] is a closed set: each variant maps to exactly one [`Emitter`] in
//! [`EditorKind::emitter`], so a new output format has to be wired there explicitly.

pub mod document;
pub mod fcpx;
pub mod xmeml;
pub(crate) mod xml;

use std::str::FromStr;

use crate::assets::registry::AssetRegistry;
use crate::foundation::error::{CutError, CutResult};
use crate::foundation::rational::Fraction;
use crate::timeline::{SequenceFormat, Timeline};

pub use document::{Document, DocumentStamp};
pub use fcpx::FcpxEmitter;
pub use xmeml::XmemlEmitter;

/// Target editor family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EditorKind {
    /// Final Cut Pro X (FCPXML 1.8).
    #[default]
    Fcpx,
    /// XML Interchange Format v5: Final Cut Pro 7, Premiere Pro, DaVinci Resolve.
    Fcp7,
}

impl EditorKind {
    /// Emitter for this editor.
    pub fn emitter(self) -> Box<dyn Emitter> {
        match self {
            Self::Fcpx => Box::new(FcpxEmitter),
            Self::Fcp7 => Box::new(XmemlEmitter),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fcpx => "fcpx",
            Self::Fcp7 => "fcp7",
        }
    }

    /// Preferred file extension of rendered documents.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Fcpx => "fcpxml",
            Self::Fcp7 => "xml",
        }
    }
}

impl std::fmt::Display for EditorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorKind {
    type Err = CutError;

    fn from_str(s: &str) -> CutResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "fcpx" | "finalcutpro" | "finalcut" | "fcp" => Ok(Self::Fcpx),
            "fcp7" | "premiere" | "premierepro" | "adobepremiere" | "resolve" | "davinci"
            | "davinciresolve" => Ok(Self::Fcp7),
            _ => Err(CutError::invalid_input(format!("unknown editor '{s}'"))),
        }
    }
}

impl TryFrom<String> for EditorKind {
    type Error = CutError;

    fn try_from(s: String) -> CutResult<Self> {
        s.parse()
    }
}

impl From<EditorKind> for String {
    fn from(kind: EditorKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// Everything an emitter reads. Rendering never mutates any of it.
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    pub timeline: &'a Timeline,
    pub registry: &'a AssetRegistry,
    pub format: &'a SequenceFormat,
    pub stamp: &'a DocumentStamp,
    /// Skip into the music bed, if the registry carries one.
    pub audio_start: Fraction,
}

/// Serializes a timeline into one editor's document format.
pub trait Emitter {
    fn kind(&self) -> EditorKind;

    /// Render the whole document in memory.
    fn render(&self, req: &RenderRequest<'_>) -> CutResult<Document>;
}

#[cfg(test)]
#[path = "../tests/unit/emit/editor.rs"]
mod tests;
