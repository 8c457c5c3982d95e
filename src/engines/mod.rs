// ABOUTME: Concrete view adapters, one per wrapped template engine
// ABOUTME: Exports the plain, Handlebars and Tera implementations of the View contract

pub mod handlebars_view;
pub mod helpers;
pub mod plain_view;
pub mod template_tree;
pub mod tera_view;

pub use handlebars_view::HandlebarsView;
pub use plain_view::{CompiledTemplate, PlainView, Segment};
pub use template_tree::TemplateTree;
pub use tera_view::TeraView;
