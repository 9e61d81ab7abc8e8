//! Capability-filtered document walk
//!
//! Each rule declares an [`Interest`]; [`walk`] makes one pass over the tree
//! and returns only the events that interest asks for, each carrying the
//! [`Scope`] it occurred in. Verbatim bodies never produce content events, and
//! math subtrees are skipped entirely for rules that cannot see math.

use crate::document::{Document, Group, GroupDelimiter, Node};

/// Environments whose body is math
pub const MATH_ENVIRONMENTS: &[&str] = &[
    "equation",
    "equation*",
    "align",
    "align*",
    "alignat",
    "alignat*",
    "eqnarray",
    "eqnarray*",
    "math",
    "displaymath",
    "gather",
    "gather*",
    "multline",
    "multline*",
    "flalign",
    "flalign*",
    "array",
];

/// Commands whose arguments are identifiers, paths or URLs rather than prose
const LITERAL_COMMANDS: &[&str] = &[
    "url",
    "nolinkurl",
    "path",
    "href",
    "label",
    "ref",
    "eqref",
    "autoref",
    "cref",
    "Cref",
    "pageref",
    "vref",
    "cite",
    "citep",
    "citet",
    "parencite",
    "textcite",
    "autocite",
    "cites",
    "nocite",
    "usepackage",
    "RequirePackage",
    "documentclass",
    "input",
    "include",
    "includegraphics",
    "bibliography",
    "bibliographystyle",
    "newcommand",
    "renewcommand",
    "providecommand",
    "newenvironment",
    "renewenvironment",
    "begin",
    "end",
    "mathrm",
    "operatorname",
];

/// Commands whose arguments switch back to text mode inside math
const TEXT_IN_MATH_COMMANDS: &[&str] = &["text", "textrm", "textit", "textbf", "mbox", "intertext"];

pub fn is_math_environment(name: &str) -> bool {
    MATH_ENVIRONMENTS.iter().any(|env| *env == name)
}

/// What a rule wants to see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interest {
    /// Text runs outside math, verbatim and literal arguments
    pub prose: bool,
    /// Text runs inside math, literal arguments excluded
    pub math_text: bool,
    pub commands: bool,
    pub comments: bool,
    /// Enter/exit events for environments, groups, arguments and math
    pub structure: bool,
}

impl Interest {
    pub const fn none() -> Self {
        Self {
            prose: false,
            math_text: false,
            commands: false,
            comments: false,
            structure: false,
        }
    }

    pub const fn with_prose(mut self) -> Self {
        self.prose = true;
        self
    }

    pub const fn with_math_text(mut self) -> Self {
        self.math_text = true;
        self
    }

    pub const fn with_commands(mut self) -> Self {
        self.commands = true;
        self
    }

    pub const fn with_comments(mut self) -> Self {
        self.comments = true;
        self
    }

    pub const fn with_structure(mut self) -> Self {
        self.structure = true;
        self
    }

    /// Whether anything inside a math subtree can matter
    const fn needs_math(&self) -> bool {
        self.math_text || self.commands || self.comments || self.structure
    }
}

/// Context a node was reached in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope<'a> {
    pub math: bool,
    pub verbatim: bool,
    /// Innermost enclosing environment
    pub environment: Option<&'a str>,
    /// Command whose argument encloses the node, if any
    pub argument_of: Option<&'a str>,
    /// Inside an argument that holds identifiers or URLs, not prose
    pub literal: bool,
}

/// A node together with its position among its siblings
#[derive(Debug, Clone, Copy)]
pub struct Visit<'d, 'a> {
    pub node: &'d Node<'a>,
    pub siblings: &'d [Node<'a>],
    pub index: usize,
    /// Set on enter/exit events of a command argument; `node` is the command
    pub argument: Option<usize>,
    pub scope: Scope<'a>,
}

impl<'d, 'a> Visit<'d, 'a> {
    /// Previous sibling
    pub fn prev(&self) -> Option<&'d Node<'a>> {
        self.index.checked_sub(1).and_then(|idx| self.siblings.get(idx))
    }

    /// Next sibling
    pub fn next(&self) -> Option<&'d Node<'a>> {
        self.siblings.get(self.index + 1)
    }

    /// Text of a text-run node
    pub fn text(&self) -> Option<&'a str> {
        self.node.as_text().map(|run| run.text)
    }

    /// The argument group this event refers to
    pub fn argument_group(&self) -> Option<&'d Group<'a>> {
        let cmd = self.node.as_command()?;
        cmd.arguments.get(self.argument?)
    }
}

/// Kinds of walk events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Prose,
    MathText,
    Command,
    Comment,
    Enter,
    Exit,
}

#[derive(Debug, Clone, Copy)]
pub struct Event<'d, 'a> {
    pub kind: EventKind,
    pub visit: Visit<'d, 'a>,
}

impl<'d, 'a> Event<'d, 'a> {
    pub fn node(&self) -> &'d Node<'a> {
        self.visit.node
    }

    pub fn scope(&self) -> Scope<'a> {
        self.visit.scope
    }
}

enum Work<'d, 'a> {
    Siblings {
        nodes: &'d [Node<'a>],
        index: usize,
        scope: Scope<'a>,
    },
    Enter(Visit<'d, 'a>),
    Exit(Visit<'d, 'a>),
}

/// Walk `document` in source order, emitting the events `interest` selects
pub fn walk<'d, 'a>(document: &'d Document<'a>, interest: Interest) -> Vec<Event<'d, 'a>> {
    let mut events = Vec::new();
    let mut emit = |kind: EventKind, visit: Visit<'d, 'a>| events.push(Event { kind, visit });

    let mut work = vec![Work::Siblings {
        nodes: &document.children,
        index: 0,
        scope: Scope::default(),
    }];

    while let Some(item) = work.pop() {
        let (nodes, index, scope) = match item {
            Work::Enter(visit) => {
                if interest.structure {
                    emit(EventKind::Enter, visit);
                }
                continue;
            }
            Work::Exit(visit) => {
                if interest.structure {
                    emit(EventKind::Exit, visit);
                }
                continue;
            }
            Work::Siblings {
                nodes,
                index,
                scope,
            } => (nodes, index, scope),
        };

        let Some(node) = nodes.get(index) else {
            continue;
        };
        work.push(Work::Siblings {
            nodes,
            index: index + 1,
            scope,
        });

        let visit = Visit {
            node,
            siblings: nodes,
            index,
            argument: None,
            scope,
        };

        match node {
            Node::Text(_) => {
                if scope.verbatim || scope.literal {
                    continue;
                }
                if scope.math {
                    if interest.math_text {
                        emit(EventKind::MathText, visit);
                    }
                } else if interest.prose {
                    emit(EventKind::Prose, visit);
                }
            }
            Node::Comment(_) => {
                if interest.comments {
                    emit(EventKind::Comment, visit);
                }
            }
            Node::Command(cmd) => {
                if interest.commands {
                    emit(EventKind::Command, visit);
                }
                let literal = LITERAL_COMMANDS.iter().any(|n| *n == cmd.name);
                let to_text = scope.math && TEXT_IN_MATH_COMMANDS.iter().any(|n| *n == cmd.name);
                let mut required = 0;
                let mut pending = Vec::with_capacity(cmd.arguments.len());
                for (idx, arg) in cmd.arguments.iter().enumerate() {
                    let arg_literal = if cmd.name == "href" {
                        arg.delimiter == GroupDelimiter::Brace && required == 0
                    } else {
                        literal
                    };
                    if arg.delimiter == GroupDelimiter::Brace {
                        required += 1;
                    }
                    let arg_scope = Scope {
                        math: scope.math && !to_text,
                        argument_of: Some(cmd.name),
                        literal: scope.literal || arg_literal,
                        ..scope
                    };
                    if arg_scope.math && !interest.needs_math() {
                        continue;
                    }
                    pending.push((idx, arg, arg_scope));
                }
                for (idx, arg, arg_scope) in pending.into_iter().rev() {
                    let arg_visit = Visit {
                        argument: Some(idx),
                        scope: arg_scope,
                        ..visit
                    };
                    work.push(Work::Exit(arg_visit));
                    work.push(Work::Siblings {
                        nodes: &arg.children,
                        index: 0,
                        scope: arg_scope,
                    });
                    work.push(Work::Enter(arg_visit));
                }
            }
            Node::Environment(env) => {
                let inner = Scope {
                    math: scope.math || is_math_environment(env.name),
                    verbatim: scope.verbatim || env.verbatim,
                    environment: Some(env.name),
                    ..scope
                };
                if inner.math && !interest.needs_math() {
                    continue;
                }
                descend(&mut work, visit, &env.children, inner);
            }
            Node::Group(group) => descend(&mut work, visit, &group.children, scope),
            Node::Math(math) => {
                if !interest.needs_math() {
                    continue;
                }
                let inner = Scope {
                    math: true,
                    ..scope
                };
                descend(&mut work, visit, &math.children, inner);
            }
        }
    }

    events
}

/// Queue enter, children and exit for a container node
fn descend<'d, 'a>(
    work: &mut Vec<Work<'d, 'a>>,
    visit: Visit<'d, 'a>,
    children: &'d [Node<'a>],
    inner: Scope<'a>,
) {
    let inner_visit = Visit {
        scope: inner,
        ..visit
    };
    work.push(Work::Exit(inner_visit));
    work.push(Work::Siblings {
        nodes: children,
        index: 0,
        scope: inner,
    });
    work.push(Work::Enter(inner_visit));
}
