#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the workspace.
//!
//! * [`cradle_error`] turns an enum into a fully wired error type.
//! * [`module_conf`] marks a struct as a module configuration structure that the
//!   directive dispatcher can own and hand back to its module.
//!
//! Both expansions refer to other workspace crates by absolute path
//! (`::thiserror`, `::cradle_kernel`), so consumers must depend on them directly.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field
///   (or a field marked `#[source]`/`#[from]`), enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: `From<&str>` and `From<String>` when an `Internal` variant is present.
/// * **Retry Classification**: Variants marked `#[retryable]` make the generated
///   `retryable()` method return `true`; every other variant returns `false`.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants wrapping external errors must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[cradle_derive::cradle_error]
/// pub enum ChannelError {
///     #[retryable]
///     #[error("Channel full{}: {message}", format_context(.context))]
///     Full { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal channel error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// assert!(ChannelError::Full { message: "peer".into(), context: None }.retryable());
/// ```
#[proc_macro_attribute]
pub fn cradle_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Attribute macro for module configuration structures.
///
/// Adds the `Debug`, `Default`, `Clone` and `PartialEq` derives that are not already
/// present and implements `cradle_kernel::domain::registry::ModuleConf`, which lets the
/// kernel keep the structure behind an opaque handle and give it back typed.
///
/// # Example
/// ```rust,ignore
/// #[cradle_derive::module_conf]
/// pub struct CoreConf {
///     pub daemon: bool,
///     pub worker_threads: usize,
/// }
///
/// let module = Module::builder("core").conf::<CoreConf>().build();
/// ```
#[proc_macro_attribute]
pub fn module_conf(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::conf::expand(input).into()
}
