//! # termtext - Localized CLI Text Rendering
//!
//! Every line a command prints goes through this crate: a display template,
//! some substitution data, a translation catalog and a color setting become
//! bytes on stdout or stderr.
//!
//! ## The Problem
//!
//! Command output has to be:
//! - translated, without every call site knowing about catalogs
//! - colored on terminals, plain in pipes and logs
//! - deterministic when several sources of data name the same placeholder
//!
//! ## The Solution
//!
//! termtext splits the work into small pieces, leaf first:
//! - **Translation** ([`Translator`]): exact-match lookup of the English source
//!   text, falling back to that text when there is no entry
//! - **Merging** ([`merge_maps`]): several [`SubstitutionMap`]s become one, the
//!   rightmost value winning
//! - **Color** ([`colorize`], [`Colorizer`]): bold/colored text under an
//!   `Enabled`/`Disabled`/`Auto` [`ColorPolicy`]
//! - **Templates** ([`Template`]): `{{.Key}}` placeholders, compiled once and
//!   rendered by key lookup
//! - **Tables** ([`format_table`]): column alignment in two passes
//!
//! [`Ui`] composes them into the operations commands call.
//!
//! ## Quick Example
//!
//! ```rust
//! use termtext::{subs, ColorPolicy, EmbeddedCatalogs, Ui, UiSettings};
//!
//! let settings = UiSettings::new(ColorPolicy::Disabled, "fr-FR");
//! let mut ui = Ui::with_sinks(&settings, &EmbeddedCatalogs, Vec::new(), Vec::new()).unwrap();
//!
//! ui.display_text(
//!     "App {{.AppName}} does not exist.",
//!     &[subs! { "AppName" => "dora" }],
//! )
//! .unwrap();
//! ui.display_failed().unwrap();
//!
//! let (out, _err) = ui.into_sinks();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "L'application dora n'existe pas.\nÉCHEC\n"
//! );
//! ```
//!
//! ## Translation Keys
//!
//! The catalog is keyed by the untranslated template, character for
//! character. Changing the punctuation or whitespace of a display string
//! without updating the catalogs silently shows the English text. Tests that
//! pin translated output catch this.
//!
//! ## Color Detection
//!
//! Under [`ColorPolicy::Auto`] a terminal check runs on every colorize call.
//! The default asks the `console` crate whether stdout is a color terminal;
//! [`Ui::with_terminal_check`] swaps it out. `Enabled` and `Disabled` never
//! consult it.

mod color;
mod error;
mod i18n;
mod merge;
mod table;
mod template;
mod ui;
mod value;

pub use color::{
    colorize, stdout_supports_color, style, ColorPolicy, Colorizer, ParseColorPolicyError,
    TerminalCheck, TextColor,
};
pub use error::{CatalogError, Error, Result, TemplateError};
pub use i18n::{
    check_placeholders, normalize_locale, Catalog, CatalogSource, EmbeddedCatalogs, Translator,
    DEFAULT_LOCALE,
};
pub use merge::merge_maps;
pub use table::{format_table, write_table, MIN_WIDTH, PADDING};
pub use template::{interpolate, Template};
pub use ui::{Ui, UiConfig, UiSettings};
pub use value::{SubstitutionMap, Value};
