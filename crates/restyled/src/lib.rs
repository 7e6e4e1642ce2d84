//! # Restyled - Content-Addressed CSS for Component Trees
//!
//! Restyled binds a style-serialization engine to a component framework's
//! render lifecycle. You describe styles as fragments attached to a base
//! element; on every render pass the fragments are resolved against the
//! current props and theme, serialized into a cache-stable class name, and
//! registered in a shared stylesheet exactly once. The result: structurally
//! identical styles share one rule and one class, no matter how many
//! definitions or mounts produced them.
//!
//! ## Core Concepts
//!
//! - [`create_styled`] / [`styled`]: build a [`StyledDefinition`] from a base
//!   element (a markup tag, a [`HostComponent`], or another definition) and
//!   style input
//! - [`StyleFragment`]: one unit of style - literal CSS, a reference to
//!   another definition, or a function of the render-time context
//! - [`StyleCache`]: the shared registry of serialized rules, one per app root
//! - [`RenderContext`]: explicit render-time context (cache + ambient theme)
//! - [`GlobalStyle`]: registers unscoped rules as a render side effect
//! - [`Theme`]: design tokens available to dynamic fragments
//!
//! ## Quick Start
//!
//! ```rust
//! use restyled::{styled, RenderContext, RenderInput};
//!
//! let button = styled("button")
//!     .unwrap()
//!     .styles("color: hotpink; padding: 4px 8px;");
//!
//! let ctx = RenderContext::detached();
//! let element = button.render(&ctx, RenderInput::new().text("Save"));
//!
//! // The class name is derived from the style content.
//! let class = element.class().unwrap().to_string();
//! assert!(class.starts_with("css-"));
//!
//! // Rendering again reuses the same rule - the sheet does not grow.
//! let again = button.render(&ctx, RenderInput::new().text("Save"));
//! assert_eq!(again.class().unwrap(), class);
//! assert_eq!(ctx.cache().rules().len(), 1);
//! ```
//!
//! ## Dynamic Styles and Themes
//!
//! Fragments can be functions of the merged prop/theme context, evaluated on
//! every render:
//!
//! ```rust
//! use restyled::{styled, RenderContext, RenderInput, StyleCache, StyleFragment, Theme};
//! use std::sync::Arc;
//!
//! let button = styled("button").unwrap().styles(vec![
//!     StyleFragment::css("padding: 4px;"),
//!     StyleFragment::dynamic(|props| {
//!         let color = props["theme"]["primary"].as_str().unwrap_or("black");
//!         StyleFragment::Css(format!("color: {};", color).into())
//!     }),
//! ]);
//!
//! let theme = Theme::new().set("primary", "hotpink");
//! let ctx = RenderContext::new(Arc::new(StyleCache::default()), theme);
//! button.render(&ctx, RenderInput::new());
//! assert!(ctx.cache().css().contains("color: hotpink;"));
//! ```
//!
//! ## Composition
//!
//! Styling an existing definition inherits its fragments; later fragments win
//! cascade ties. [`StyledDefinition::with_component`] swaps the rendered
//! element while keeping the accumulated styles.
//!
//! ```rust
//! use restyled::{styled, RenderContext, RenderInput};
//!
//! let base = styled("button").unwrap().styles("color: red; padding: 4px;");
//! let loud = styled(&base).unwrap().styles("color: blue;");
//!
//! let ctx = RenderContext::detached();
//! let element = loud.render(&ctx, RenderInput::new());
//! // One merged rule: red first, blue overrides.
//! assert!(ctx.cache().css().contains("color: red; padding: 4px;color: blue;"));
//! # let _ = element;
//! ```
//!
//! ## App Installation
//!
//! One cache per app root, shared by every mounted definition:
//!
//! ```rust
//! use restyled::{install, App, InstallOptions};
//!
//! let mut app = App::new();
//! install(&mut app, InstallOptions::default());
//! let ctx = app.render_context();
//! assert_eq!(ctx.cache().key(), "css");
//! ```
//!
//! ## Server Rendering
//!
//! After rendering HTML, extract just the rules the document uses:
//!
//! ```rust
//! use restyled::{styled, RenderContext, RenderInput};
//! use restyled::server::render_style;
//!
//! let ctx = RenderContext::detached();
//! let button = styled("button").unwrap().styles("color: red;");
//! let html = button.render(&ctx, RenderInput::new()).to_html();
//!
//! let style_tag = render_style(&html, ctx.cache());
//! assert!(style_tag.starts_with("<style data-emotion-css="));
//! ```

pub mod app;
pub mod cache;
pub mod element;
pub mod error;
pub mod fragment;
pub mod global;
pub mod render;
pub mod runtime;
pub mod serialize;
pub mod server;
pub mod styled;
pub mod theme;

pub use app::{install, App, InstallOptions};
pub use cache::{InsertionMarker, StyleCache};
pub use element::{Element, ElementTag, Node, PropMap};
pub use error::{ConfigurationError, ThemeError};
pub use fragment::{StyleFragment, StyleInput, Template};
pub use global::GlobalStyle;
pub use render::{RenderContext, RenderInput};
pub use runtime::{build_mode, reset_build_mode, set_build_mode, BuildMode};
pub use serialize::{serialize_styles, Serialized};
pub use server::{extract_critical, render_style, Critical};
pub use styled::{
    create_styled, styled, BaseElement, HostComponent, StyleAttacher, StyledDefinition,
    StyledOptions,
};
pub use theme::Theme;
