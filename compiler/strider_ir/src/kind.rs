//! Operation kinds.
//!
//! Every node carries exactly one `Kind`. The engine binds one primitive
//! operation per kind; structural kinds (literals, identifiers, declarations,
//! type expressions) bind to a no-op because their value is produced by the
//! resolver or by their enclosing operation.

use std::fmt;

/// Closed set of node kinds understood by the execution engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    // Structural
    /// Compile-time constant; value carried on the node.
    BasicLit,
    /// Identifier use or definition.
    Ident,
    /// Function or method declaration; carries a [`FuncDef`](crate::FuncDef).
    FuncDecl,
    /// Function signature.
    FuncType,
    /// Parameter or result list.
    FieldList,
    /// Statement block.
    Block,
    /// `x.f` selector; for method calls carries the method and promotion path.
    Selector,
    /// `k: v` element of a map or keyed composite literal.
    KeyValue,
    /// Type expression.
    TypeExpr,
    /// `switch` statement; child 0 is the governing expression.
    Switch,
    /// One `case` clause of a switch.
    CaseClause,
    /// `m[k]` as an assignment target.
    IndexExpr,

    // Operations
    /// Elided operation.
    Nop,
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    Neg,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Lower,
    LowerEqual,
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    Not,
    /// Logical and (short-circuit).
    Land,
    /// Logical or (short-circuit).
    Lor,
    Inc,
    Dec,
    /// Parallel assignment of k destinations from k sources.
    Assign,
    /// Spread assignment from one multi-result call.
    AssignX,
    /// Zero-value assignment.
    Assign0,
    /// Store through a pointer.
    AssignPtr,
    /// Map index write.
    AssignMap,
    ArrayLit,
    MapLit,
    /// Positional struct literal.
    CompositeLit,
    /// Keyed struct literal.
    CompositeSparse,
    GetIndex,
    GetIndexAddr,
    GetIndexSeq,
    GetIndexMap,
    Make,
    Recv,
    Send,
    Close,
    Len,
    Sleep,
    Println,
    /// One iteration step of a `for range` loop.
    Range,
    Return,
    /// Case comparator of a switch clause.
    Case,
    Call,
    /// Concurrent call (`go f(...)`).
    GoCall,
    /// Closure creation.
    FuncLit,
}

impl Kind {
    /// Number of kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Every kind, in declaration order.
    pub const ALL: [Kind; 58] = [
        Kind::BasicLit,
        Kind::Ident,
        Kind::FuncDecl,
        Kind::FuncType,
        Kind::FieldList,
        Kind::Block,
        Kind::Selector,
        Kind::KeyValue,
        Kind::TypeExpr,
        Kind::Switch,
        Kind::CaseClause,
        Kind::IndexExpr,
        Kind::Nop,
        Kind::Add,
        Kind::Sub,
        Kind::Mul,
        Kind::Quo,
        Kind::Rem,
        Kind::Neg,
        Kind::Equal,
        Kind::NotEqual,
        Kind::Greater,
        Kind::GreaterEqual,
        Kind::Lower,
        Kind::LowerEqual,
        Kind::And,
        Kind::Or,
        Kind::Not,
        Kind::Land,
        Kind::Lor,
        Kind::Inc,
        Kind::Dec,
        Kind::Assign,
        Kind::AssignX,
        Kind::Assign0,
        Kind::AssignPtr,
        Kind::AssignMap,
        Kind::ArrayLit,
        Kind::MapLit,
        Kind::CompositeLit,
        Kind::CompositeSparse,
        Kind::GetIndex,
        Kind::GetIndexAddr,
        Kind::GetIndexSeq,
        Kind::GetIndexMap,
        Kind::Make,
        Kind::Recv,
        Kind::Send,
        Kind::Close,
        Kind::Len,
        Kind::Sleep,
        Kind::Println,
        Kind::Range,
        Kind::Return,
        Kind::Case,
        Kind::Call,
        Kind::GoCall,
        Kind::FuncLit,
    ];

    /// Whether this kind only structures the graph and never computes.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Kind::BasicLit
                | Kind::Ident
                | Kind::FuncDecl
                | Kind::FuncType
                | Kind::FieldList
                | Kind::Block
                | Kind::Selector
                | Kind::KeyValue
                | Kind::TypeExpr
                | Kind::Switch
                | Kind::CaseClause
                | Kind::IndexExpr
        )
    }

    /// Whether the walker may suspend the activation inside this operation.
    pub fn may_block(self) -> bool {
        matches!(self, Kind::Recv | Kind::Send | Kind::Sleep | Kind::Range)
    }

    /// Map a language builtin name to the operation implementing it.
    ///
    /// The front end uses this to bind builtin calls such as `make(...)`
    /// directly to their primitive operation instead of a `Call`.
    pub fn builtin(name: &str) -> Option<Kind> {
        match name {
            "make" => Some(Kind::Make),
            "println" => Some(Kind::Println),
            "sleep" => Some(Kind::Sleep),
            "len" => Some(Kind::Len),
            "close" => Some(Kind::Close),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
