//! Directive key resolution
//!
//! Maps the semantic option names callers use (`width`, `cropMode`,
//! `overlay_text_color`, ...) to the short codes the renderer understands.
//! Resolution is total: a key the table does not know is still emitted,
//! either verbatim after the `raw:` marker or as the key text itself.

use crate::constants::RAW_KEY_PREFIX;

/// A resolved directive key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Key found in the lookup table
    Known(&'static str),
    /// Key emitted as written (unknown or explicitly raw)
    Raw(&'a str),
}

impl<'a> Directive<'a> {
    pub fn code(&self) -> &'a str {
        match self {
            Directive::Known(code) => code,
            Directive::Raw(text) => text,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Directive::Known(_))
    }

    /// Directives whose value is an asset path rather than a scalar
    pub fn takes_path(&self) -> bool {
        matches!(self, Directive::Known("di") | Directive::Known("oi"))
    }
}

/// Codes that themselves contain the key/value delimiter
pub(crate) const COMPOUND_CODES: &[&str] = &[
    "e-sharpen",
    "e-usm",
    "e-contrast",
    "e-grayscale",
    "e-shadow",
    "e-gradient",
    "e-removedotbg",
    "e-bgremove",
    "e-dropshadow",
    "e-changebg",
    "e-edit",
    "e-retouch",
    "e-upscale",
    "e-genvar",
];

/// Resolve a caller-supplied key to its directive
///
/// Never fails. Lookup ignores case and underscores, so `cropMode`,
/// `crop_mode` and `CROPMODE` all resolve to `cm`.
pub fn resolve_directive(key: &str) -> Directive<'_> {
    if let Some(raw) = key.strip_prefix(RAW_KEY_PREFIX) {
        return Directive::Raw(raw);
    }

    match lookup(&normalize(key)) {
        Some(code) => Directive::Known(code),
        None => Directive::Raw(key),
    }
}

fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn lookup(name: &str) -> Option<&'static str> {
    let code = match name {
        // Resize and crop
        "height" => "h",
        "width" => "w",
        "aspectratio" => "ar",
        "crop" => "c",
        "cropmode" => "cm",
        "x" => "x",
        "y" => "y",
        "xc" => "xc",
        "yc" => "yc",
        "focus" => "fo",
        "zoom" => "z",
        "dpr" => "dpr",

        // Output
        "quality" => "q",
        "format" => "f",
        "progressive" => "pr",
        "lossless" => "lo",
        "metadata" => "md",
        "colorprofile" => "cp",
        "original" => "orig",
        "page" => "pg",
        "named" => "n",
        "defaultimage" => "di",

        // Appearance
        "radius" => "r",
        "background" => "bg",
        "border" => "b",
        "rotation" | "rotate" => "rt",
        "flip" => "fl",
        "blur" => "bl",
        "opacity" => "o",
        "trim" => "t",

        // Effects
        "effectsharpen" => "e-sharpen",
        "effectusm" => "e-usm",
        "effectcontrast" => "e-contrast",
        "effectgray" | "effectgrayscale" => "e-grayscale",
        "effectshadow" => "e-shadow",
        "effectgradient" => "e-gradient",

        // Video
        "startoffset" => "so",
        "endoffset" => "eo",
        "duration" => "du",
        "videocodec" => "vc",
        "audiocodec" => "ac",
        "streamingresolutions" => "sr",

        // Text layers
        "fontsize" => "fs",
        "fontfamily" => "ff",
        "fontcolor" => "co",
        "typography" => "tg",
        "padding" => "pa",
        "alpha" => "al",
        "lineheight" => "lh",

        // Legacy overlay parameters
        "overlayx" => "ox",
        "overlayy" => "oy",
        "overlayfocus" => "ofo",
        "overlayheight" => "oh",
        "overlaywidth" => "ow",
        "overlayimage" => "oi",
        "overlayimagetrim" => "oit",
        "overlayimageaspectratio" => "oiar",
        "overlayimagebackground" => "oibg",
        "overlayimageborder" => "oib",
        "overlayimagedpr" => "oidpr",
        "overlayimagequality" => "oiq",
        "overlayimagecropping" => "oic",
        "overlayimagefocus" => "oifo",
        "overlaytext" => "ot",
        "overlaytextfontsize" => "ots",
        "overlaytextfontfamily" => "otf",
        "overlaytextcolor" => "otc",
        "overlaytexttransparency" | "overlayalpha" => "oa",
        "overlaytexttypography" => "ott",
        "overlaybackground" => "obg",
        "overlaytextencoded" => "ote",
        "overlaytextwidth" => "otw",
        "overlaytextbackground" => "otbg",
        "overlaytextpadding" => "otp",
        "overlaytextinneralignment" => "otia",
        "overlayradius" => "or",
        _ => return None,
    };
    Some(code)
}
