use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Backdrop,
    Poster,
}

/// One entry of a title's image gallery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallpaper {
    pub id: String, // Raw upstream file path, reused as identity
    pub kind: ImageKind,
    pub url: String,
    pub width: u32,
    pub height: u32,
}
