//! Transformation compiler
//!
//! Turns an ordered chain of option mappings into the directive string the
//! remote renderer understands:
//!
//! ```text
//! [{width: 300, height: 200}, {rotation: 90}]  =>  w-300,h-200:rt-90
//! ```
//!
//! Steps are joined with `:`, options within a step with `,`, and a code is
//! separated from its value by `-`. Overlays embed a nested chain between
//! `l-<kind>` and `l-end`.

pub mod directive;
pub mod escape;
pub mod parse;

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CHAIN_DELIMITER, KEY_VALUE_DELIMITER, MAX_LAYER_DEPTH, OPTION_DELIMITER, RAW_FRAGMENT_KEY,
};
use crate::error::{ImageKitError, Result};

pub use directive::{resolve_directive, Directive};
pub use escape::{escape_value, unescape_value};
pub use parse::{parse, ParsedLayer, ParsedOption, ParsedStep};

/// Value of a single transformation option
#[derive(Debug, Clone, PartialEq)]
pub enum TransformValue {
    /// `true` emits the bare code, `false` omits the option
    Flag(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    /// Nested overlay layer
    Layer(Box<Overlay>),
}

impl TransformValue {
    /// Interpret a textual value the way a command line or config would
    pub fn infer(text: &str) -> Self {
        match text {
            "true" => return Self::Flag(true),
            "false" => return Self::Flag(false),
            _ => {}
        }
        if let Ok(n) = text.parse::<i64>() {
            return Self::Integer(n);
        }
        match text.parse::<f64>() {
            Ok(x) if x.is_finite() => Self::Decimal(x),
            _ => Self::Text(text.to_string()),
        }
    }
}

impl From<bool> for TransformValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i32> for TransformValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for TransformValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for TransformValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for TransformValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for TransformValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TransformValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Overlay> for TransformValue {
    fn from(value: Overlay) -> Self {
        Self::Layer(Box::new(value))
    }
}

/// Kind of asset an overlay layer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Image,
    Text,
    Video,
    Subtitle,
    Solid,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Video => "video",
            Self::Subtitle => "subtitles",
            Self::Solid => "solid",
        }
    }
}

impl FromStr for LayerKind {
    type Err = ImageKitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image" => Ok(Self::Image),
            "text" => Ok(Self::Text),
            "video" => Ok(Self::Video),
            "subtitles" | "subtitle" => Ok(Self::Subtitle),
            "solid" => Ok(Self::Solid),
            _ => Err(ImageKitError::encoding(format!(
                "unknown layer kind '{}'",
                s
            ))),
        }
    }
}

/// An overlay layer with its own transformation chain
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub kind: LayerKind,
    /// Asset path, text, or color the layer is built from
    pub input: Option<String>,
    pub transformation: TransformationChain,
}

impl Overlay {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            input: None,
            transformation: TransformationChain::new(),
        }
    }

    pub fn image(path: impl Into<String>) -> Self {
        Self::new(LayerKind::Image).with_input(path)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(LayerKind::Text).with_input(text)
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_transformation(mut self, chain: impl Into<TransformationChain>) -> Self {
        self.transformation = chain.into();
        self
    }
}

/// One step of a chain: an ordered mapping of directive key to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformationStep {
    options: Vec<(String, TransformValue)>,
}

impl TransformationStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn set(mut self, key: impl Into<String>, value: impl Into<TransformValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a key, replacing an existing value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TransformValue>) {
        let key = key.into();
        let value = value.into();
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.options.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TransformValue> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn options(&self) -> &[(String, TransformValue)] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn width(self, value: impl Into<TransformValue>) -> Self {
        self.set("width", value)
    }

    pub fn height(self, value: impl Into<TransformValue>) -> Self {
        self.set("height", value)
    }

    pub fn quality(self, value: impl Into<TransformValue>) -> Self {
        self.set("quality", value)
    }

    pub fn crop(self, value: impl Into<TransformValue>) -> Self {
        self.set("crop", value)
    }

    pub fn format(self, value: impl Into<TransformValue>) -> Self {
        self.set("format", value)
    }

    /// Pre-compiled fragment emitted verbatim
    pub fn raw(self, fragment: impl Into<String>) -> Self {
        self.set(RAW_FRAGMENT_KEY, fragment.into())
    }

    pub fn overlay(self, overlay: Overlay) -> Self {
        self.set("overlay", overlay)
    }

    /// Parse `key=value` assignments separated by commas
    ///
    /// Values are typed with [`TransformValue::infer`]; a bare key is a
    /// `true` flag.
    pub fn parse_assignments(text: &str) -> Self {
        let mut step = Self::new();
        for assignment in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match assignment.split_once('=') {
                Some((key, value)) => step.insert(key.trim(), TransformValue::infer(value.trim())),
                None => step.insert(assignment, true),
            }
        }
        step
    }
}

/// Ordered sequence of transformation steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformationChain {
    steps: Vec<TransformationStep>,
}

impl TransformationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, builder style
    pub fn then(mut self, step: TransformationStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: TransformationStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[TransformationStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(TransformationStep::is_empty)
    }

    pub fn compile(&self) -> Result<String> {
        compile(self)
    }
}

impl From<TransformationStep> for TransformationChain {
    fn from(step: TransformationStep) -> Self {
        Self { steps: vec![step] }
    }
}

impl From<Vec<TransformationStep>> for TransformationChain {
    fn from(steps: Vec<TransformationStep>) -> Self {
        Self { steps }
    }
}

impl FromIterator<TransformationStep> for TransformationChain {
    fn from_iter<I: IntoIterator<Item = TransformationStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for TransformationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match compile(self) {
            Ok(compiled) => f.write_str(&compiled),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Compile a chain into its directive string
///
/// An empty chain, or one whose options are all `false`, compiles to `""`.
pub fn compile(chain: &TransformationChain) -> Result<String> {
    compile_chain(chain, 0)
}

fn compile_chain(chain: &TransformationChain, depth: usize) -> Result<String> {
    let mut steps = Vec::with_capacity(chain.steps.len());
    for step in &chain.steps {
        let compiled = compile_step(step, depth)?;
        if !compiled.is_empty() {
            steps.push(compiled);
        }
    }
    Ok(steps.join(&CHAIN_DELIMITER.to_string()))
}

fn compile_step(step: &TransformationStep, depth: usize) -> Result<String> {
    let mut parts = Vec::with_capacity(step.options.len());
    for (key, value) in &step.options {
        if let Some(part) = compile_option(key, value, depth)? {
            parts.push(part);
        }
    }
    Ok(parts.join(&OPTION_DELIMITER.to_string()))
}

fn compile_option(key: &str, value: &TransformValue, depth: usize) -> Result<Option<String>> {
    if key == RAW_FRAGMENT_KEY {
        if let TransformValue::Text(fragment) = value {
            return Ok((!fragment.is_empty()).then(|| fragment.clone()));
        }
    }

    let directive = resolve_directive(key);
    let code = directive.code();

    let rendered = match value {
        TransformValue::Flag(false) => return Ok(None),
        TransformValue::Flag(true) => return Ok(Some(code.to_string())),
        TransformValue::Layer(overlay) => return compile_layer(overlay, depth + 1).map(Some),
        TransformValue::Integer(n) => n.to_string(),
        TransformValue::Decimal(x) if x.is_finite() => x.to_string(),
        TransformValue::Decimal(x) => {
            return Err(ImageKitError::encoding(format!(
                "'{}' must be a finite number, got {}",
                key, x
            )))
        }
        TransformValue::Text(text) if text.is_empty() => return Ok(None),
        TransformValue::Text(text) if text == "-" => return Ok(Some(code.to_string())),
        TransformValue::Text(text) if directive.takes_path() => trim_slashes(text).to_string(),
        TransformValue::Text(text) => text.clone(),
    };

    Ok(Some(format!(
        "{}{}{}",
        code,
        KEY_VALUE_DELIMITER,
        escape_value(&rendered)?
    )))
}

fn compile_layer(overlay: &Overlay, depth: usize) -> Result<String> {
    if depth > MAX_LAYER_DEPTH {
        return Err(ImageKitError::usage(format!(
            "overlay nesting exceeds the maximum depth of {}",
            MAX_LAYER_DEPTH
        )));
    }

    let mut parts = vec![format!("l-{}", overlay.kind.as_str())];

    if let Some(input) = overlay.input.as_deref().map(trim_slashes) {
        if !input.is_empty() {
            parts.push(format!("i-{}", escape_value(input)?));
        }
    }

    let nested = compile_chain(&overlay.transformation, depth)?;
    if !nested.is_empty() {
        parts.push(nested);
    }

    parts.push("l-end".to_string());
    Ok(parts.join(&OPTION_DELIMITER.to_string()))
}

fn trim_slashes(value: &str) -> &str {
    value.trim_matches('/')
}
