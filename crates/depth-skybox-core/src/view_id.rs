//! Source view identifiers and the filename grammar that carries them.
//!
//! Every source image of a panorama is named
//!
//! ```text
//! token := pano "_" kind stack "_" angle "." ext
//! pano  := [A-Za-z0-9]+
//! kind  := "i" (color, ext = "jpg") | "d" (depth, ext = "png")
//! stack := digit in 0..NUM_STACKS
//! angle := digit in 0..NUM_ANGLES
//! ```
//!
//! e.g. `0f37bd0737e349de9d536263a4bdd60d_i1_5.jpg`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vertically stacked cameras per rig position.
pub const NUM_STACKS: u8 = 3;
/// Yaw positions per camera stack.
pub const NUM_ANGLES: u8 = 6;
/// Source views per panorama.
pub const VIEWS_PER_PANORAMA: usize = NUM_STACKS as usize * NUM_ANGLES as usize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewIdError {
    #[error("`{0}` has no file extension")]
    MissingExtension(String),
    #[error("unsupported extension `{ext}` in `{token}`")]
    UnsupportedExtension { token: String, ext: String },
    #[error("`{0}` does not match `<pano>_<kind><stack>_<angle>.<ext>`")]
    Malformed(String),
    #[error("panorama id in `{0}` must be a non-empty alphanumeric string")]
    InvalidPanorama(String),
    #[error("unknown image kind `{kind}` in `{token}`")]
    UnknownKind { token: String, kind: char },
    #[error("camera stack {stack} out of range 0..3 in `{token}`")]
    StackOutOfRange { token: String, stack: u32 },
    #[error("angle {angle} out of range 0..6 in `{token}`")]
    AngleOutOfRange { token: String, angle: u32 },
    #[error("`{token}` names a {kind} image but has extension `{ext}`")]
    KindMismatch {
        token: String,
        kind: ImageKind,
        ext: String,
    },
}

/// Kind of source image a filename token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKind {
    Color,
    Depth,
}

impl ImageKind {
    fn marker(self) -> char {
        match self {
            ImageKind::Color => 'i',
            ImageKind::Depth => 'd',
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ImageKind::Color => "jpg",
            ImageKind::Depth => "png",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Color => write!(f, "color"),
            ImageKind::Depth => write!(f, "depth"),
        }
    }
}

/// One camera stack of one panorama; intrinsics are shared per stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackId {
    pub pano: String,
    pub stack: u8,
}

/// One source view: `(panorama, camera stack, yaw angle)`.
///
/// The derived ordering is the rig iteration order used for compositing:
/// stack-major, then angle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId {
    pub pano: String,
    pub stack: u8,
    pub angle: u8,
}

impl ViewId {
    pub fn new(pano: impl Into<String>, stack: u8, angle: u8) -> Self {
        Self {
            pano: pano.into(),
            stack,
            angle,
        }
    }

    pub fn stack_id(&self) -> StackId {
        StackId {
            pano: self.pano.clone(),
            stack: self.stack,
        }
    }

    /// All views of a panorama in rig order (stack 0..3 x angle 0..6).
    pub fn rig_order(pano: &str) -> impl Iterator<Item = ViewId> + '_ {
        (0..NUM_STACKS).flat_map(move |stack| {
            (0..NUM_ANGLES).map(move |angle| ViewId::new(pano, stack, angle))
        })
    }

    /// Index of this view in rig order.
    pub fn rig_index(&self) -> usize {
        self.stack as usize * NUM_ANGLES as usize + self.angle as usize
    }

    /// Filename of this view's image of the given kind.
    pub fn file_name(&self, kind: ImageKind) -> String {
        format!(
            "{}_{}{}_{}.{}",
            self.pano,
            kind.marker(),
            self.stack,
            self.angle,
            kind.extension()
        )
    }

    /// Filename of the hole-filled depth image for this view.
    pub fn filled_depth_file_name(&self) -> String {
        format!("{}_d{}_{}_filled.png", self.pano, self.stack, self.angle)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_i{}_{}", self.pano, self.stack, self.angle)
    }
}

/// A parsed image filename token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewToken {
    pub view: ViewId,
    pub kind: ImageKind,
}

impl ViewToken {
    pub fn parse(token: &str) -> Result<Self, ViewIdError> {
        let (stem, ext) = token
            .rsplit_once('.')
            .ok_or_else(|| ViewIdError::MissingExtension(token.to_string()))?;
        let ext_kind = match ext {
            "jpg" => ImageKind::Color,
            "png" => ImageKind::Depth,
            _ => {
                return Err(ViewIdError::UnsupportedExtension {
                    token: token.to_string(),
                    ext: ext.to_string(),
                });
            }
        };

        let mut parts = stem.split('_');
        let (Some(pano), Some(camera), Some(angle), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ViewIdError::Malformed(token.to_string()));
        };

        if pano.is_empty() || !pano.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ViewIdError::InvalidPanorama(token.to_string()));
        }

        let mut camera_chars = camera.chars();
        let kind = match camera_chars.next() {
            Some('i') => ImageKind::Color,
            Some('d') => ImageKind::Depth,
            Some(other) => {
                return Err(ViewIdError::UnknownKind {
                    token: token.to_string(),
                    kind: other,
                });
            }
            None => return Err(ViewIdError::Malformed(token.to_string())),
        };
        if kind != ext_kind {
            return Err(ViewIdError::KindMismatch {
                token: token.to_string(),
                kind,
                ext: ext.to_string(),
            });
        }

        let stack = parse_index(camera_chars.as_str(), token)?;
        if stack >= NUM_STACKS as u32 {
            return Err(ViewIdError::StackOutOfRange {
                token: token.to_string(),
                stack,
            });
        }
        let angle = parse_index(angle, token)?;
        if angle >= NUM_ANGLES as u32 {
            return Err(ViewIdError::AngleOutOfRange {
                token: token.to_string(),
                angle,
            });
        }

        Ok(Self {
            view: ViewId::new(pano, stack as u8, angle as u8),
            kind,
        })
    }
}

fn parse_index(s: &str, token: &str) -> Result<u32, ViewIdError> {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ViewIdError::Malformed(token.to_string()));
    }
    s.parse()
        .map_err(|_| ViewIdError::Malformed(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANO: &str = "0f37bd0737e349de9d536263a4bdd60d";

    #[test]
    fn parses_color_and_depth_tokens() {
        let c = ViewToken::parse(&format!("{PANO}_i1_5.jpg")).unwrap();
        assert_eq!(c.kind, ImageKind::Color);
        assert_eq!(c.view, ViewId::new(PANO, 1, 5));

        let d = ViewToken::parse(&format!("{PANO}_d2_0.png")).unwrap();
        assert_eq!(d.kind, ImageKind::Depth);
        assert_eq!(d.view, ViewId::new(PANO, 2, 0));
    }

    #[test]
    fn file_names_roundtrip_through_parser() {
        let v = ViewId::new("abc123", 0, 4);
        for kind in [ImageKind::Color, ImageKind::Depth] {
            let parsed = ViewToken::parse(&v.file_name(kind)).unwrap();
            assert_eq!(parsed.view, v);
            assert_eq!(parsed.kind, kind);
        }
    }

    #[test]
    fn rejects_malformed_tokens() {
        let cases = [
            "noextension",
            "abc_i0_0.bmp",
            "abc_i0.jpg",
            "abc_i0_0_1.jpg",
            "_i0_0.jpg",
            "ab-c_i0_0.jpg",
            "abc_x0_0.jpg",
            "abc_i_0.jpg",
            "abc_i0_.jpg",
            "abc_i3_0.jpg",
            "abc_i0_6.jpg",
            "abc_i0_-1.jpg",
            "abc_d0_0.jpg",
            "abc_i0_0.png",
        ];
        for case in cases {
            assert!(ViewToken::parse(case).is_err(), "accepted `{case}`");
        }
    }

    #[test]
    fn out_of_range_errors_name_the_value() {
        let err = ViewToken::parse("abc_i7_0.jpg").unwrap_err();
        assert_eq!(
            err,
            ViewIdError::StackOutOfRange {
                token: "abc_i7_0.jpg".to_string(),
                stack: 7
            }
        );
    }

    #[test]
    fn rig_order_is_stack_major() {
        let order: Vec<ViewId> = ViewId::rig_order("p").collect();
        assert_eq!(order.len(), VIEWS_PER_PANORAMA);
        assert_eq!(order[0], ViewId::new("p", 0, 0));
        assert_eq!(order[6], ViewId::new("p", 1, 0));
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(order.iter().enumerate().all(|(i, v)| v.rig_index() == i));
    }
}
