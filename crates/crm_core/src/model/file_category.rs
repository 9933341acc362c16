//! File-type classification for attachments and documents.
//!
//! Classification uses the text after the last `.` of the file name,
//! compared case-insensitively. Categories are checked in declaration order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Audio,
    Video,
    Image,
    Pdf,
    Code,
    Text,
    Sheet,
    Zip,
    File,
}

const AUDIO: &[&str] = &["aif", "iff", "m3u", "m4a", "mid", "mp3", "mpa", "wav", "wma"];
const VIDEO: &[&str] = &[
    "3g2", "3gp", "asf", "avi", "flv", "m4v", "mov", "mp4", "mpg", "rm", "srt", "swf", "vob",
    "wmv",
];
const IMAGE: &[&str] = &[
    "ai", "bmp", "dds", "gif", "jpg", "jpeg", "png", "psd", "pspimage", "tga", "thm", "tif",
    "tiff", "yuv",
];
const PDF: &[&str] = &["indd", "pct", "pdf"];
const CODE: &[&str] = &[
    "asp", "aspx", "bat", "c", "cc", "cmd", "coffee", "cpp", "cs", "css", "cxx", "diff", "go",
    "h", "hs", "htm", "html", "java", "js", "json", "jsx", "kt", "less", "lua", "m", "php", "pl",
    "ps1", "py", "pyw", "r", "rb", "rs", "scss", "sh", "sql", "swift", "ts", "tsx", "vb", "xml",
    "xsl", "xslt", "yaml", "yml",
];
const TEXT: &[&str] = &[
    "doc", "docx", "log", "msg", "odt", "pages", "rtf", "tex", "txt", "wpd", "wps",
];
const SHEET: &[&str] = &["csv", "xls", "xlsx", "xlsm", "xlsb", "xltx", "xltm", "xlt"];
const ZIP: &[&str] = &["zip", "7z", "gz", "rar", "zipx", "ace", "tar"];

const TABLE: [(FileCategory, &[&str]); 8] = [
    (FileCategory::Audio, AUDIO),
    (FileCategory::Video, VIDEO),
    (FileCategory::Image, IMAGE),
    (FileCategory::Pdf, PDF),
    (FileCategory::Code, CODE),
    (FileCategory::Text, TEXT),
    (FileCategory::Sheet, SHEET),
    (FileCategory::Zip, ZIP),
];

impl FileCategory {
    /// Classifies a file name or path. Names without an extension are `File`.
    pub fn from_file_name(file_name: &str) -> Self {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return Self::File;
        };
        let ext = ext.to_ascii_lowercase();
        TABLE
            .iter()
            .find(|(_, extensions)| extensions.contains(&ext.as_str()))
            .map(|(category, _)| *category)
            .unwrap_or(Self::File)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Code => "code",
            Self::Text => "text",
            Self::Sheet => "sheet",
            Self::Zip => "zip",
            Self::File => "file",
        }
    }

    /// Icon class shown next to the file in list views.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Audio => "fa fa-file-audio",
            Self::Video => "fa fa-file-video",
            Self::Image => "fa fa-file-image",
            Self::Pdf => "fa fa-file-pdf",
            Self::Code => "fa fa-file-code",
            Self::Text => "fa fa-file-alt",
            Self::Sheet => "fa fa-file-excel",
            Self::Zip => "fa fa-file-archive",
            Self::File => "fa fa-file",
        }
    }
}
