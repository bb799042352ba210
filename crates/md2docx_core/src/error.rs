use std::fmt;
use thiserror::Error;

/// The part of the export pipeline that was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Document,
    Styles,
    Numbering,
    Footer,
    CoreProperties,
    Package,
    Schedule,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Document => "document",
            ExportStage::Styles => "styles",
            ExportStage::Numbering => "numbering",
            ExportStage::Footer => "footer",
            ExportStage::CoreProperties => "core-properties",
            ExportStage::Package => "package",
            ExportStage::Schedule => "schedule",
        };
        f.write_str(name)
    }
}

/// Export failed. No partial document is produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export failed while writing {stage}: {source}")]
    Xml {
        stage: ExportStage,
        #[source]
        source: quick_xml::Error,
    },

    #[error("export failed while packaging: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("export failed while packaging: {0}")]
    Io(#[from] std::io::Error),

    #[error("export already in progress for this document")]
    InProgress,

    #[error("export task aborted: {0}")]
    Aborted(String),
}

impl ExportError {
    pub fn stage(&self) -> ExportStage {
        match self {
            ExportError::Xml { stage, .. } => *stage,
            ExportError::Package(_) | ExportError::Io(_) => ExportStage::Package,
            ExportError::InProgress | ExportError::Aborted(_) => ExportStage::Schedule,
        }
    }

    /// Whether trying again later can succeed without changing the input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExportError::InProgress | ExportError::Aborted(_))
    }
}

/// The print-layout preview could not be compiled.
#[derive(Debug, Error)]
#[error("preview compilation failed: {0}")]
pub struct PreviewError(pub String);
