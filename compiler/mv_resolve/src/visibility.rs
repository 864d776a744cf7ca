//! Visibility of a resolved declaration from a reference site.

use mv_ir::ast::{NodeKind, Visibility};
use mv_ir::NodeId;
use mv_stack::Cancelled;

use crate::{ItemScope, ResolutionContext, Resolver};

impl Resolver<'_> {
    /// Whether `decl` may be referenced from the site described by `ctx`.
    ///
    /// Invisible candidates are still returned by resolution so that callers
    /// can report them; this only decides the flag.
    pub fn is_visible(&self, ctx: &ResolutionContext, decl: NodeId) -> Result<bool, Cancelled> {
        let project = self.project();
        let tree = project.tree();
        let kind = tree.kind(decl);

        // Bindings and members are reachable wherever their scope is.
        if matches!(
            kind,
            NodeKind::Pat(_)
                | NodeKind::PatField(_)
                | NodeKind::Param(_)
                | NodeKind::TypeParam(_)
                | NodeKind::SchemaField(_)
                | NodeKind::ItemSpec(_)
                | NodeKind::Field(_)
        ) {
            return Ok(true);
        }

        if !ctx.allows(ItemScope::of(project, decl)) {
            return Ok(false);
        }

        let spec_only = match kind {
            NodeKind::Function(f) => f.is_spec(),
            NodeKind::Schema(_) | NodeKind::GlobalVar(_) => true,
            _ => tree.containing_module_spec(decl).is_some(),
        };
        if spec_only && !ctx.in_spec {
            return Ok(false);
        }

        if matches!(kind, NodeKind::Module(_)) {
            return Ok(true);
        }
        let owner = tree.containing_module(decl).or_else(|| {
            tree.containing_module_spec(decl)
                .and_then(|spec| project.module_spec_target(spec))
        });
        if owner.is_some() && owner == ctx.module {
            return Ok(true);
        }

        match kind {
            NodeKind::Function(f) => {
                if ctx.in_use {
                    return Ok(true);
                }
                match f.visibility {
                    Visibility::Public | Visibility::Script => Ok(true),
                    Visibility::Private => Ok(false),
                    Visibility::Friend => match (owner, ctx.module) {
                        (Some(owner), Some(here)) => self.is_friend_of(owner, here),
                        _ => Ok(false),
                    },
                    Visibility::Package => Ok(ctx.package.is_some()
                        && ctx.package == project.package_id_of(decl)),
                }
            }
            NodeKind::Const(_) => Ok(false),
            _ => Ok(true),
        }
    }

    /// Whether `owner` declares `module` as a friend.
    fn is_friend_of(&self, owner: NodeId, module: NodeId) -> Result<bool, Cancelled> {
        let tree = self.project().tree();
        let Some(decl) = tree.as_module(owner) else {
            return Ok(false);
        };
        for &friend in &decl.friends {
            let Some(friend) = tree.as_friend(friend) else {
                continue;
            };
            if self
                .resolve(friend.path)?
                .iter()
                .any(|resolved| resolved.element == module)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
