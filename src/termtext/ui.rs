//! # The `Ui` Facade
//!
//! [`Ui`] is what commands talk to. It owns the output and error sinks, the
//! color policy and the translator, and every user-visible line goes through
//! one of its `display_*` methods.
//!
//! ## Merge and translation order
//!
//! Display methods take a template plus zero or more [`SubstitutionMap`]s:
//!
//! 1. the maps are merged, rightmost value winning ([`merge_maps`]);
//! 2. the *untranslated* template text is looked up in the catalog;
//! 3. the (possibly translated) template is rendered with the merged map.
//!
//! Values are never translated unless the method says so
//! ([`Ui::display_text_with_key_translations`]).
//!
//! ## Template defects
//!
//! A malformed template or a reference to a key that was not supplied is a
//! bug in the calling command, not a runtime condition. Display methods panic
//! on them, before anything is written, so output already on the sink stays
//! intact.

use crate::color::{ColorPolicy, Colorizer, TextColor};
use crate::error::{Result, TemplateError};
use crate::i18n::{CatalogSource, EmbeddedCatalogs, Translator};
use crate::merge::merge_maps;
use crate::table::write_table;
use crate::template::Template;
use crate::value::{SubstitutionMap, Value};
use std::collections::HashMap;
use std::io::{self, Stderr, Stdout, Write};
use std::sync::Arc;

const OK: &str = "OK";
const FAILED: &str = "FAILED";

/// The settings a [`Ui`] is built from.
pub trait UiConfig {
    /// Color setting for styled output.
    fn color_enabled(&self) -> ColorPolicy;

    /// Locale to translate output to. Empty means the default locale.
    fn locale(&self) -> String;
}

/// A plain [`UiConfig`] value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiSettings {
    pub color: ColorPolicy,
    pub locale: String,
}

impl UiSettings {
    pub fn new(color: ColorPolicy, locale: &str) -> Self {
        Self {
            color,
            locale: locale.to_string(),
        }
    }
}

impl UiConfig for UiSettings {
    fn color_enabled(&self) -> ColorPolicy {
        self.color
    }

    fn locale(&self) -> String {
        self.locale.clone()
    }
}

/// Renders localized, optionally colored text to an output and an error sink.
///
/// # Example
///
/// ```rust
/// use termtext::{subs, Ui};
///
/// let mut ui = Ui::for_test(Vec::new(), Vec::new());
/// ui.display_text("App {{.AppName}} started", &[subs! { "AppName" => "dora" }])
///     .unwrap();
/// assert_eq!(ui.out(), b"App dora started\n");
/// ```
pub struct Ui<O = Stdout, E = Stderr> {
    out: O,
    err: E,
    colorizer: Colorizer,
    translator: Translator,
    templates: HashMap<String, Arc<Template>>,
}

impl Ui<Stdout, Stderr> {
    /// Creates a UI writing to stdout and stderr, translating with the
    /// built-in catalogs.
    ///
    /// # Errors
    ///
    /// Fails when the catalog for the configured locale cannot be loaded.
    pub fn new(config: &impl UiConfig) -> Result<Self> {
        Self::with_sinks(config, &EmbeddedCatalogs, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Ui<O, E> {
    /// Creates a UI over explicit sinks and catalogs.
    ///
    /// # Errors
    ///
    /// Fails when the catalog for the configured locale cannot be loaded.
    pub fn with_sinks(
        config: &impl UiConfig,
        catalogs: &impl CatalogSource,
        out: O,
        err: E,
    ) -> Result<Self> {
        let translator = Translator::resolve(&config.locale(), catalogs)?;
        let colorizer = Colorizer::new(config.color_enabled());
        tracing::debug!(
            locale = translator.locale(),
            color = ?colorizer.policy(),
            "ui ready"
        );
        Ok(Self::from_parts(out, err, colorizer, translator))
    }

    pub fn from_parts(out: O, err: E, colorizer: Colorizer, translator: Translator) -> Self {
        Self {
            out,
            err,
            colorizer,
            translator,
            templates: HashMap::new(),
        }
    }

    /// A UI with color disabled and no translation.
    pub fn for_test(out: O, err: E) -> Self {
        Self::from_parts(
            out,
            err,
            Colorizer::new(ColorPolicy::Disabled),
            Translator::identity(),
        )
    }

    /// Replaces the terminal check used under [`ColorPolicy::Auto`].
    pub fn with_terminal_check(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.colorizer = self.colorizer.with_terminal_check(check);
        self
    }

    pub fn out(&self) -> &O {
        &self.out
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    pub fn into_sinks(self) -> (O, E) {
        (self.out, self.err)
    }

    pub fn locale(&self) -> &str {
        self.translator.locale()
    }

    pub fn color_policy(&self) -> ColorPolicy {
        self.colorizer.policy()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Merges `maps`, translates `template` and writes the result plus a
    /// newline to the output sink.
    ///
    /// # Panics
    ///
    /// When the template is malformed or references a key missing from the
    /// merged maps.
    pub fn display_text(&mut self, template: &str, maps: &[SubstitutionMap]) -> io::Result<()> {
        let merged = merge_maps(maps);
        let text = self.render(template, &merged);
        emit(&mut self.out, &text, true)
    }

    /// Like [`Ui::display_text`], but the values of `keys_to_translate` are
    /// translated as well. Other values are used as given.
    ///
    /// # Panics
    ///
    /// When a listed key is missing or does not hold a string, and in the
    /// cases [`Ui::display_text`] panics.
    pub fn display_text_with_key_translations(
        &mut self,
        template: &str,
        keys_to_translate: &[&str],
        maps: &[SubstitutionMap],
    ) -> io::Result<()> {
        let mut merged = merge_maps(maps).into_owned();
        for key in keys_to_translate {
            let translated = match merged.get(*key) {
                Some(Value::String(source)) => self.translator.translate(source).to_string(),
                Some(other) => panic!("cannot translate key {key:?}: {other:?} is not a string"),
                None => panic!("cannot translate key {key:?}: no such key"),
            };
            merged.insert((*key).to_string(), Value::String(translated));
        }
        let text = self.render(template, &merged);
        emit(&mut self.out, &text, true)
    }

    /// Writes `"<label>: <text>"` to the output sink, translating both.
    ///
    /// # Panics
    ///
    /// In the cases [`Ui::display_text`] panics.
    pub fn display_pair(
        &mut self,
        label: &str,
        template: &str,
        maps: &[SubstitutionMap],
    ) -> io::Result<()> {
        let merged = merge_maps(maps);
        let text = self.render(template, &merged);
        let line = format!("{}: {}", self.translator.translate(label), text);
        emit(&mut self.out, &line, true)
    }

    /// Translates `text` and writes it in bold.
    pub fn display_help_header(&mut self, text: &str) -> io::Result<()> {
        let header = self
            .colorizer
            .colorize(self.translator.translate(text), TextColor::Default, true);
        emit(&mut self.out, &header, true)
    }

    /// Like [`Ui::display_text`], with every substituted value shown in bold
    /// cyan.
    ///
    /// # Panics
    ///
    /// In the cases [`Ui::display_text`] panics.
    pub fn display_header_flavor_text(
        &mut self,
        template: &str,
        maps: &[SubstitutionMap],
    ) -> io::Result<()> {
        let mut merged = merge_maps(maps).into_owned();
        for value in merged.values_mut() {
            let styled = self
                .colorizer
                .colorize(&value.to_string(), TextColor::Cyan, true);
            *value = Value::String(styled);
        }
        let text = self.render(template, &merged);
        emit(&mut self.out, &text, true)
    }

    /// Writes a translated, bold green `OK`.
    pub fn display_ok(&mut self) -> io::Result<()> {
        self.display_status(OK, TextColor::Green)
    }

    /// Writes a translated, bold red `FAILED`.
    pub fn display_failed(&mut self) -> io::Result<()> {
        self.display_status(FAILED, TextColor::Red)
    }

    pub fn display_newline(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    /// Like [`Ui::display_text`], but written to the error sink.
    ///
    /// # Panics
    ///
    /// In the cases [`Ui::display_text`] panics.
    pub fn display_error_message(
        &mut self,
        template: &str,
        maps: &[SubstitutionMap],
    ) -> io::Result<()> {
        let merged = merge_maps(maps);
        let text = self.render(template, &merged);
        emit(&mut self.err, &text, true)
    }

    /// Writes `rows` as aligned columns, each line starting with `prefix`,
    /// and flushes the output sink.
    pub fn display_table(&mut self, prefix: &str, rows: &[Vec<String>]) -> io::Result<()> {
        write_table(&mut self.out, prefix, rows)
    }

    fn display_status(&mut self, status: &str, color: TextColor) -> io::Result<()> {
        let text = self
            .colorizer
            .colorize(self.translator.translate(status), color, true);
        emit(&mut self.out, &text, true)
    }

    /// Translates and renders `template`. Compiled templates are kept per
    /// translated text.
    fn render(&mut self, template: &str, data: &SubstitutionMap) -> String {
        let translated = self.translator.translate(template);
        let compiled = match self.templates.get(translated) {
            Some(compiled) => Arc::clone(compiled),
            None => {
                let compiled = Arc::new(Template::parse(translated).unwrap_or_else(|e| fatal(e)));
                self.templates
                    .insert(translated.to_string(), Arc::clone(&compiled));
                compiled
            }
        };
        compiled.render(data).unwrap_or_else(|e| fatal(e))
    }
}

fn fatal(err: TemplateError) -> ! {
    panic!("display template defect: {}", err)
}

/// One write for the text, then the newline on its own.
fn emit<W: Write>(sink: &mut W, text: &str, newline: bool) -> io::Result<()> {
    sink.write_all(text.as_bytes())?;
    if newline {
        sink.write_all(b"\n")?;
    }
    Ok(())
}
