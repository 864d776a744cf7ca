//! Immutable syntax arena.

use crate::ast::{
    AttrItem, Block, ConstDecl, EnumDecl, ExprKind, FieldDecl, File, FriendDecl, FunctionDecl,
    GlobalVarDecl, ItemSpecDecl, MatchArm, ModuleDecl, ModuleSpecDecl, NodeKind, ParamDecl,
    PatField, PatKind, Path, SchemaDecl, SchemaFieldDecl, StmtKind, StructDecl, StructLitField,
    TypeExprKind, TypeParamDecl, UseSpeck, UseStmt, VariantDecl,
};
use crate::{NodeId, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Arena of syntax nodes for all files of a project snapshot.
///
/// Built by [`TreeBuilder`](crate::TreeBuilder); read-only afterwards and
/// shared between threads.
#[derive(Clone, Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    files: Vec<NodeId>,
}

macro_rules! typed_accessors {
    ($($fn_name:ident => $variant:ident($ty:ty);)*) => {
        $(
            #[inline]
            pub fn $fn_name(&self, id: NodeId) -> Option<&$ty> {
                match self.get(id).map(|node| &node.kind) {
                    Some(NodeKind::$variant(inner)) => Some(inner),
                    _ => None,
                }
            }
        )*
    };
}

impl SyntaxTree {
    /// Freeze `nodes` into a tree, linking every child to its parent.
    ///
    /// Nodes that are nobody's child and are not files stay parentless.
    pub fn from_nodes(mut nodes: Vec<Node>) -> Self {
        let mut links = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            let Ok(raw) = u32::try_from(index) else {
                break;
            };
            let parent = NodeId::new(raw);
            for child in node.kind.children() {
                links.push((child, parent));
            }
        }
        for (child, parent) in links {
            if let Some(node) = nodes.get_mut(child.index()) {
                node.parent = Some(parent);
            }
        }
        let files = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node.kind, NodeKind::File(_)))
            .filter_map(|(index, _)| u32::try_from(index).ok().map(NodeId::new))
            .collect();
        SyntaxTree { nodes, files }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Kind of `id`.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map_or(Span::DUMMY, |node| node.span)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All `File` roots.
    pub fn files(&self) -> &[NodeId] {
        &self.files
    }

    /// Strict ancestors of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&node| self.parent(node))
    }

    /// `id` followed by its ancestors; empty if `id` is not in the tree.
    pub fn ancestors_or_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.get(id).map(|_| id);
        std::iter::successors(start, move |&node| self.parent(node))
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(n) = self.get(node) {
                let children = n.kind.children();
                stack.extend(children.into_iter().rev());
            }
        }
        out
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors_or_self(id).any(|node| node == ancestor)
    }

    /// Nearest enclosing `Module`, `id` included.
    pub fn containing_module(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors_or_self(id)
            .find(|&node| matches!(self.kind(node), NodeKind::Module(_)))
    }

    /// Nearest enclosing `ModuleSpec`, `id` included.
    pub fn containing_module_spec(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors_or_self(id)
            .find(|&node| matches!(self.kind(node), NodeKind::ModuleSpec(_)))
    }

    pub fn containing_file(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors_or_self(id)
            .find(|&node| matches!(self.kind(node), NodeKind::File(_)))
    }

    /// Nearest enclosing statement, `id` included.
    pub fn containing_stmt(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors_or_self(id)
            .find(|&node| matches!(self.kind(node), NodeKind::Stmt(_)))
    }

    /// Nearest function, item spec, schema, constant or module spec, the
    /// units that own an inference result.
    pub fn inference_owner(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors_or_self(id).find(|&node| {
            matches!(
                self.kind(node),
                NodeKind::Function(_)
                    | NodeKind::ItemSpec(_)
                    | NodeKind::Schema(_)
                    | NodeKind::Const(_)
            )
        })
    }

    /// Whether `id` sits in specification code: spec functions, item specs,
    /// schemas, module specs or spec predicates.
    pub fn is_in_spec(&self, id: NodeId) -> bool {
        self.ancestors_or_self(id).any(|node| match self.kind(node) {
            NodeKind::Function(f) => f.is_spec(),
            NodeKind::ItemSpec(_)
            | NodeKind::Schema(_)
            | NodeKind::ModuleSpec(_)
            | NodeKind::GlobalVar(_)
            | NodeKind::Stmt(StmtKind::Spec { .. })
            | NodeKind::Expr(ExprKind::Quant { .. }) => true,
            _ => false,
        })
    }

    typed_accessors! {
        as_file => File(File);
        as_module => Module(ModuleDecl);
        as_module_spec => ModuleSpec(ModuleSpecDecl);
        as_use_stmt => UseStmt(UseStmt);
        as_use_speck => UseSpeck(UseSpeck);
        as_friend => Friend(FriendDecl);
        as_struct => Struct(StructDecl);
        as_enum => Enum(EnumDecl);
        as_variant => Variant(VariantDecl);
        as_field => Field(FieldDecl);
        as_function => Function(FunctionDecl);
        as_param => Param(ParamDecl);
        as_type_param => TypeParam(TypeParamDecl);
        as_const => Const(ConstDecl);
        as_schema => Schema(SchemaDecl);
        as_schema_field => SchemaField(SchemaFieldDecl);
        as_global_var => GlobalVar(GlobalVarDecl);
        as_item_spec => ItemSpec(ItemSpecDecl);
        as_attr => Attr(AttrItem);
        as_block => Block(Block);
        as_stmt => Stmt(StmtKind);
        as_expr => Expr(ExprKind);
        as_pat => Pat(PatKind);
        as_pat_field => PatField(PatField);
        as_struct_lit_field => StructLitField(StructLitField);
        as_match_arm => MatchArm(MatchArm);
        as_path => Path(Path);
        as_type => Type(TypeExprKind);
    }
}

#[cfg(test)]
mod tests;
