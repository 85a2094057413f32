// AST (Abstract Syntax Tree) definitions for Verilog/SystemVerilog sources

pub mod expr;

pub use expr::*;

use super::source::SourceInfo;
use super::token::{Token, TokenKind};
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Contiguous, half-open range of indices into the parser's token arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every node knows where it starts and which tokens it covers
pub trait SyntaxNode {
    fn location(&self) -> SourceLocation;
    fn range(&self) -> TokenRange;
}

macro_rules! syntax_node {
    ($($node:ty),* $(,)?) => {
        $(
            impl SyntaxNode for $node {
                fn location(&self) -> SourceLocation {
                    self.location
                }

                fn range(&self) -> TokenRange {
                    self.range
                }
            }
        )*
    };
}

pub(crate) use syntax_node;

/// Result of a successful parse: the top-level items plus the token arena and
/// source text their ranges refer to
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub items: Vec<Item>,
    pub tokens: Vec<Token>,
    pub source: SourceInfo,
}

impl SourceUnit {
    /// Exact source text covered by `range`, comments and whitespace included.
    pub fn text(&self, range: TokenRange) -> &str {
        if range.is_empty() {
            return "";
        }
        let (Some(first), Some(last)) = (self.tokens.get(range.start), self.tokens.get(range.end - 1))
        else {
            return "";
        };
        self.source
            .text
            .get(first.offset..last.end_offset())
            .unwrap_or("")
    }

    /// Source text of any node
    pub fn node_text(&self, node: &impl SyntaxNode) -> &str {
        self.text(node.range())
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> {
        self.items.iter().filter_map(|item| match item {
            Item::Module(module) => Some(module),
            Item::Directive(_) => None,
        })
    }
}

/// Top-level item
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Module(ModuleNode),
    Directive(DirectiveNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub name: String,
    pub params: Vec<ParamDefNode>,
    pub ports: PortList,
    pub body: Vec<BodyItem>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PortList {
    /// No port list, or `()`
    Empty,
    Ansi(Vec<AnsiPortDefNode>),
    NonAnsi(Vec<NonAnsiPortDefNode>),
}

impl PortList {
    pub fn is_empty(&self) -> bool {
        match self {
            PortList::Empty => true,
            PortList::Ansi(ports) => ports.is_empty(),
            PortList::NonAnsi(ports) => ports.is_empty(),
        }
    }
}

/// `parameter`/`localparam` group sharing one optional data type
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDefNode {
    pub local: bool,
    pub data_type: Option<DataTypeNode>,
    pub assignments: Vec<ParamAssignNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamAssignNode {
    pub name: String,
    pub dims: Vec<Dimension>,
    pub default: Option<Expr>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signing {
    Signed,
    Unsigned,
}

/// `logic signed [7:0]`, `int unsigned`, `real`, or an implicit `signed [3:0]`
#[derive(Debug, Clone, PartialEq)]
pub struct DataTypeNode {
    /// `None` for implicit types
    pub keyword: Option<TokenKind>,
    pub signing: Option<Signing>,
    pub packed: Vec<RangeNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `[left:right]`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeNode {
    pub left: Expr,
    pub right: Expr,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `[size]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexNode {
    pub index: Expr,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Unpacked dimension following a declared name
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Range(RangeNode),
    Size(IndexNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
    Inout,
}

impl Direction {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Input => Some(Direction::Input),
            TokenKind::Output => Some(Direction::Output),
            TokenKind::Inout => Some(Direction::Inout),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Inout => "inout",
        }
    }
}

/// `name [dims] [= init]`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefInitNode {
    pub name: String,
    pub dims: Vec<Dimension>,
    pub init: Option<Expr>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Header port group, or a port redeclared in a module body
#[derive(Debug, Clone, PartialEq)]
pub struct AnsiPortDefNode {
    pub direction: Direction,
    pub net_type: Option<TokenKind>,
    pub data_type: Option<DataTypeNode>,
    pub declarators: Vec<VariableDefInitNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NonAnsiPortDefNode {
    pub name: String,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Net or variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefNode {
    pub net_type: Option<TokenKind>,
    pub data_type: Option<DataTypeNode>,
    pub declarators: Vec<VariableDefInitNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenvarNode {
    pub names: Vec<String>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Continuous assignment
#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub delay: Option<DelayNode>,
    pub assignments: Vec<Expr>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlwaysKind {
    Always,
    Comb,
    Ff,
    Latch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlwaysBlockNode {
    pub kind: AlwaysKind,
    pub sensitivity: Option<SensitivityNode>,
    pub body: Statement,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialBlockNode {
    pub body: Statement,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Posedge,
    Negedge,
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    pub edge: Option<Edge>,
    pub expr: Expr,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `@*`, `@(*)`, `@(posedge clk or negedge rst)`, `@sig`
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityNode {
    pub star: bool,
    pub events: Vec<EventNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Module instantiation
#[derive(Debug, Clone, PartialEq)]
pub struct InstantiationNode {
    pub prototype: String,
    pub params: Vec<ParaSetNode>,
    pub instance: String,
    pub ports: Vec<PortConnectNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `.name(value)` or a positional value inside `#( ... )`
#[derive(Debug, Clone, PartialEq)]
pub struct ParaSetNode {
    pub name: Option<String>,
    pub value: Option<Expr>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `.name(value)`, `.name()` or a positional connection
#[derive(Debug, Clone, PartialEq)]
pub struct PortConnectNode {
    pub name: Option<String>,
    pub value: Option<Expr>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Items of a generate scope: `begin [: label] ... end` or one bare item
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateBlockNode {
    pub label: Option<String>,
    pub items: Vec<BodyItem>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRegionNode {
    pub items: Vec<BodyItem>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateIfNode {
    pub condition: Expr,
    pub then_block: GenerateBlockNode,
    pub else_block: Option<GenerateBlockNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateForNode {
    pub header: LoopHeaderNode,
    pub body: GenerateBlockNode,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateCaseNode {
    pub selector: Expr,
    pub items: Vec<CaseItemNode<GenerateBlockNode>>,
    pub default: Option<GenerateBlockNode>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateNode {
    If(GenerateIfNode),
    For(GenerateForNode),
    Case(GenerateCaseNode),
}

/// Pre-compile directive
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveNode {
    pub kind: DirectiveKind,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    S,
    Ms,
    Us,
    Ns,
    Ps,
    Fs,
}

impl TimeUnit {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Second => Some(TimeUnit::S),
            TokenKind::MilliSecond => Some(TimeUnit::Ms),
            TokenKind::MicroSecond => Some(TimeUnit::Us),
            TokenKind::NanoSecond => Some(TimeUnit::Ns),
            TokenKind::PicoSecond => Some(TimeUnit::Ps),
            TokenKind::FemtoSecond => Some(TimeUnit::Fs),
            _ => None,
        }
    }
}

/// `1ns`, `100ps`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    pub magnitude: u32,
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind {
    ResetAll,
    CellDefine,
    EndCellDefine,
    BeginKeywords { version: String },
    EndKeywords,
    /// Recorded, never followed
    Include { path: String },
    Timescale { unit: TimeValue, precision: TimeValue },
    DefaultNettype { net_type: String },
    UnconnectedDrive { pull: TokenKind },
    NoUnconnectedDrive,
    /// `ifdef`/`ifndef` span whose contents were skipped
    Conditional {
        negated: bool,
        macro_name: String,
        skipped: TokenRange,
    },
}

/// Module body item
#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    ParamDef(ParamDefNode),
    PortDef(AnsiPortDefNode),
    VariableDef(VariableDefNode),
    Genvar(GenvarNode),
    Assign(AssignNode),
    Always(AlwaysBlockNode),
    Initial(InitialBlockNode),
    Instantiation(InstantiationNode),
    Block(GenerateBlockNode),
    Generate(GenerateNode),
    GenerateRegion(GenerateRegionNode),
    Directive(DirectiveNode),
    Empty(EmptyNode),
}

/// Lone `;`
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyNode {
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    Case,
    Casez,
    Casex,
}

/// `label, label: body`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseItemNode<T> {
    pub labels: Vec<Expr>,
    pub body: T,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `for` header: `init; condition; step`
#[derive(Debug, Clone, PartialEq)]
pub struct LoopHeaderNode {
    pub init: Option<ForInitNode>,
    pub condition: Option<Expr>,
    pub step: Option<Expr>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `genvar i = 0`, `int i = 0` or `i = 0`
#[derive(Debug, Clone, PartialEq)]
pub struct ForInitNode {
    pub genvar: bool,
    pub data_type: Option<DataTypeNode>,
    pub assignment: Expr,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeginEndNode {
    pub label: Option<String>,
    pub statements: Vec<Statement>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfElseNode {
    pub condition: Expr,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseNode {
    pub kind: CaseKind,
    pub selector: Expr,
    pub items: Vec<CaseItemNode<Statement>>,
    pub default: Option<Box<Statement>>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub header: LoopHeaderNode,
    pub body: Box<Statement>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `#delay statement`
#[derive(Debug, Clone, PartialEq)]
pub struct DelayStatementNode {
    pub delay: DelayNode,
    pub body: Box<Statement>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// `@(...) statement`
#[derive(Debug, Clone, PartialEq)]
pub struct EventStatementNode {
    pub sensitivity: SensitivityNode,
    pub body: Box<Statement>,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Assignment, increment or call used as a statement
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatementNode {
    pub expr: Expr,
    pub location: SourceLocation,
    pub range: TokenRange,
}

/// Procedural statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(BeginEndNode),
    If(IfElseNode),
    Case(CaseNode),
    For(ForNode),
    Delay(DelayStatementNode),
    Event(EventStatementNode),
    Expression(ExpressionStatementNode),
    Empty(EmptyNode),
}

syntax_node!(
    ModuleNode,
    ParamDefNode,
    ParamAssignNode,
    DataTypeNode,
    RangeNode,
    IndexNode,
    VariableDefInitNode,
    AnsiPortDefNode,
    NonAnsiPortDefNode,
    VariableDefNode,
    GenvarNode,
    AssignNode,
    AlwaysBlockNode,
    InitialBlockNode,
    EventNode,
    SensitivityNode,
    InstantiationNode,
    ParaSetNode,
    PortConnectNode,
    GenerateBlockNode,
    GenerateRegionNode,
    GenerateIfNode,
    GenerateForNode,
    GenerateCaseNode,
    DirectiveNode,
    EmptyNode,
    LoopHeaderNode,
    ForInitNode,
    BeginEndNode,
    IfElseNode,
    CaseNode,
    ForNode,
    DelayStatementNode,
    EventStatementNode,
    ExpressionStatementNode,
);

impl<T> SyntaxNode for CaseItemNode<T> {
    fn location(&self) -> SourceLocation {
        self.location
    }

    fn range(&self) -> TokenRange {
        self.range
    }
}

impl SyntaxNode for Dimension {
    fn location(&self) -> SourceLocation {
        match self {
            Dimension::Range(node) => node.location,
            Dimension::Size(node) => node.location,
        }
    }

    fn range(&self) -> TokenRange {
        match self {
            Dimension::Range(node) => node.range,
            Dimension::Size(node) => node.range,
        }
    }
}

impl GenerateNode {
    fn as_node(&self) -> &dyn SyntaxNode {
        match self {
            GenerateNode::If(node) => node,
            GenerateNode::For(node) => node,
            GenerateNode::Case(node) => node,
        }
    }
}

impl SyntaxNode for GenerateNode {
    fn location(&self) -> SourceLocation {
        self.as_node().location()
    }

    fn range(&self) -> TokenRange {
        self.as_node().range()
    }
}

impl Item {
    fn as_node(&self) -> &dyn SyntaxNode {
        match self {
            Item::Module(node) => node,
            Item::Directive(node) => node,
        }
    }
}

impl SyntaxNode for Item {
    fn location(&self) -> SourceLocation {
        self.as_node().location()
    }

    fn range(&self) -> TokenRange {
        self.as_node().range()
    }
}

impl BodyItem {
    fn as_node(&self) -> &dyn SyntaxNode {
        match self {
            BodyItem::ParamDef(node) => node,
            BodyItem::PortDef(node) => node,
            BodyItem::VariableDef(node) => node,
            BodyItem::Genvar(node) => node,
            BodyItem::Assign(node) => node,
            BodyItem::Always(node) => node,
            BodyItem::Initial(node) => node,
            BodyItem::Instantiation(node) => node,
            BodyItem::Block(node) => node,
            BodyItem::Generate(node) => node,
            BodyItem::GenerateRegion(node) => node,
            BodyItem::Directive(node) => node,
            BodyItem::Empty(node) => node,
        }
    }
}

impl SyntaxNode for BodyItem {
    fn location(&self) -> SourceLocation {
        self.as_node().location()
    }

    fn range(&self) -> TokenRange {
        self.as_node().range()
    }
}

impl Statement {
    fn as_node(&self) -> &dyn SyntaxNode {
        match self {
            Statement::Block(node) => node,
            Statement::If(node) => node,
            Statement::Case(node) => node,
            Statement::For(node) => node,
            Statement::Delay(node) => node,
            Statement::Event(node) => node,
            Statement::Expression(node) => node,
            Statement::Empty(node) => node,
        }
    }
}

impl SyntaxNode for Statement {
    fn location(&self) -> SourceLocation {
        self.as_node().location()
    }

    fn range(&self) -> TokenRange {
        self.as_node().range()
    }
}
