use log::debug;
use once_cell::sync::Lazy;

use crate::context::{ConvertContext, ConvertOptions};
use crate::error::ConvertError;
use crate::model::{Document, LineEnding};
use crate::parsing::{self, TransformPipeline};
use crate::serialize::SerializerSet;

/// Markup to tree and back with one fixed set of options, transformers and
/// serializers. Build once and share between threads; every call takes its
/// own [`ConvertContext`].
pub struct Converter {
    pub options: ConvertOptions,
    pub pipeline: TransformPipeline,
    pub serializers: SerializerSet,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Result<Self, ConvertError> {
        let pipeline = TransformPipeline::with_builtins(&options)?;
        let serializers = SerializerSet::new(&options);
        Ok(Self {
            options,
            pipeline,
            serializers,
        })
    }

    /// Tokenize, transform and convert `markup`.
    pub fn parse(&self, markup: &str, ctx: &ConvertContext<'_>) -> Result<Document, ConvertError> {
        let line_ending = LineEnding::detect(markup).unwrap_or(self.options.line_ending);
        let tokens = parsing::tokenize(markup, line_ending);
        debug!("{} block tokens, line ending {line_ending:?}", tokens.len());
        let tokens = self.pipeline.apply(tokens, ctx);
        let mut doc = parsing::convert(tokens, ctx)?;
        doc.line_ending = line_ending;
        Ok(doc)
    }

    pub fn serialize(&self, doc: &Document, ctx: &ConvertContext<'_>) -> String {
        self.serializers.serialize(doc, ctx)
    }
}

static DEFAULT_CONVERTER: Lazy<Result<Converter, ConvertError>> =
    Lazy::new(|| Converter::new(ConvertOptions::default()));

/// The shared converter with default options, built on first use.
pub fn default_converter() -> Result<&'static Converter, ConvertError> {
    DEFAULT_CONVERTER.as_ref().map_err(Clone::clone)
}

/// [`Converter::parse`] with default options.
pub fn parse(markup: &str, ctx: &ConvertContext<'_>) -> Result<Document, ConvertError> {
    default_converter()?.parse(markup, ctx)
}

/// [`Converter::serialize`] with default options.
pub fn serialize(doc: &Document, ctx: &ConvertContext<'_>) -> String {
    match default_converter() {
        Ok(converter) => converter.serialize(doc, ctx),
        Err(_) => SerializerSet::new(&ConvertOptions::default()).serialize(doc, ctx),
    }
}
