//! Name resolution for Move.
//!
//! Given a `Path` node, [`Resolver`] finds every declaration it may refer
//! to, honoring lexical scoping, `use` imports, named addresses, module specs
//! and the main / test / verify build flavours. Each candidate carries a
//! visibility flag so that callers can distinguish "not found" from "found
//! but not accessible".
//!
//! # Layers
//!
//! - [`scope_chain`] lists the scope levels visible from a node.
//! - [`scope_entries`] lists what each level declares.
//! - [`Resolver`] classifies paths, walks the chain, follows imports and
//!   qualifiers, and attaches visibility.
//! - [`ResolveCache`] memoizes results keyed by path node and
//!   [`DependencyToken`](mv_ir::DependencyToken).
//!
//! Resolution is read-only over a [`Project`](mv_ir::Project) snapshot and
//! safe to run from many threads against a shared cache.

mod address;
mod cache;
mod context;
mod entry;
mod namespace;
mod path_kind;
mod resolver;
mod scope;
mod use_items;
mod visibility;

pub use address::resolve_named_address;
pub use cache::ResolveCache;
pub use context::{ItemScope, ResolutionContext};
pub use entry::{pattern_bindings, scope_entries, EntryTarget, ScopeEntry};
pub use namespace::Namespace;
pub use path_kind::{classify, path_namespaces, PathKind};
pub use resolver::{ResolvedPath, Resolver};
pub use scope::{item_spec_target, scope_chain, Scope, ScopeKind};
pub use use_items::{use_items, use_module_path, UseItem, UseKind};

pub use mv_stack::{CancellationFlag, Cancelled};
