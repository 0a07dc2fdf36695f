//! Textual syntax for type terms
//!
//! Terms print in operator notation, `->(boolean boolean boolean)`, and
//! parse back from it. Tokens are whitespace-separated; parentheses
//! delimit children. Printing always emits the canonical spelling (`->`
//! for lambda, `#N` for placeholders), while parsing also accepts the
//! `_type`-suffixed aliases.

use logos::Logos;

use crate::context::TypeContext;
use crate::error::TypeError;
use crate::ty::{PrimitiveType, Type, TypeId};

/// Render a term in canonical textual form
pub fn print(ctx: &TypeContext, ty: TypeId) -> String {
    let mut out = String::new();
    print_into(ctx, ty, &mut out);
    out
}

fn print_into(ctx: &TypeContext, ty: TypeId, out: &mut String) {
    use std::fmt::Write;
    let term = ctx.get_unchecked(ty);
    let head = match term {
        Type::Primitive(p) => {
            let _ = write!(out, "{}", p);
            return;
        }
        Type::Argument(n) => {
            let _ = write!(out, "#{}", n);
            return;
        }
        Type::Unknown => {
            out.push_str("unknown");
            return;
        }
        Type::IllFormed => {
            out.push_str("ill_formed");
            return;
        }
        Type::Lambda(_) => "->",
        Type::Application(_) => "application",
        Type::Union(_) => "union",
        Type::ArgList(_) => "arg_list",
    };
    out.push_str(head);
    out.push('(');
    for (i, child) in term.children().iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        print_into(ctx, *child, out);
    }
    out.push(')');
}

/// Parse a term from its textual form
///
/// Unknown tokens, `#0`, and structural violations (childless operators,
/// an `arg_list` without exactly one child, leaves written with children)
/// are rejected with a [`TypeError`].
pub fn parse(ctx: &mut TypeContext, input: &str) -> Result<TypeId, TypeError> {
    let tokens = tokenize(input)?;
    let mut pos = 0;
    let ty = parse_node(ctx, &tokens, &mut pos)?;
    if pos != tokens.len() {
        return Err(TypeError::TrailingToken {
            token: token_text(&tokens[pos]),
        });
    }
    Ok(ty)
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[token("(")]
    Open,

    #[token(")")]
    Close,

    /// Anything else up to whitespace or a parenthesis
    #[regex(r"[^ \t\r\n\f()]+")]
    Atom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn token_text(token: &Token<'_>) -> String {
    match token {
        Token::Open => "(".to_string(),
        Token::Close => ")".to_string(),
        Token::Atom(text) => (*text).to_string(),
    }
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, TypeError> {
    let mut lexer = RawToken::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let token = match result {
            Ok(RawToken::Open) => Token::Open,
            Ok(RawToken::Close) => Token::Close,
            Ok(RawToken::Atom) => Token::Atom(lexer.slice()),
            Err(()) => {
                return Err(TypeError::UnexpectedToken {
                    token: lexer.slice().to_string(),
                })
            }
        };
        tokens.push(token);
    }
    Ok(tokens)
}

enum Head {
    Lambda,
    Application,
    Union,
    ArgList,
    Primitive(PrimitiveType),
    Unknown,
    IllFormed,
    Argument(u32),
}

fn classify(token: &str) -> Result<Head, TypeError> {
    let head = match token {
        "->" | "lambda" | "lambda_type" => Head::Lambda,
        "application" | "application_type" => Head::Application,
        "union" | "union_type" => Head::Union,
        "arg_list" | "arg_list_type" => Head::ArgList,
        "boolean" | "boolean_type" => Head::Primitive(PrimitiveType::Boolean),
        "contin" | "contin_t" | "contin_type" => Head::Primitive(PrimitiveType::Contin),
        "action_result" | "action_result_type" => Head::Primitive(PrimitiveType::ActionResult),
        "definite_object" | "definite_object_type" => {
            Head::Primitive(PrimitiveType::DefiniteObject)
        }
        "action_definite_object" | "action_definite_object_type" => {
            Head::Primitive(PrimitiveType::ActionDefiniteObject)
        }
        "indefinite_object" | "indefinite_object_type" => {
            Head::Primitive(PrimitiveType::IndefiniteObject)
        }
        "message" | "message_type" => Head::Primitive(PrimitiveType::Message),
        "action_symbol" | "action_symbol_type" => Head::Primitive(PrimitiveType::ActionSymbol),
        "wild_card" | "wild_card_type" => Head::Primitive(PrimitiveType::WildCard),
        "unknown" | "unknown_type" => Head::Unknown,
        "ill_formed" | "ill_formed_type" => Head::IllFormed,
        _ => {
            if let Some(digits) = token.strip_prefix('#') {
                let idx: u32 = digits.parse().map_err(|_| TypeError::InvalidPlaceholder {
                    token: token.to_string(),
                })?;
                if idx == 0 {
                    return Err(TypeError::InvalidPlaceholder {
                        token: token.to_string(),
                    });
                }
                Head::Argument(idx)
            } else {
                return Err(TypeError::UnexpectedToken {
                    token: token.to_string(),
                });
            }
        }
    };
    Ok(head)
}

fn parse_node(
    ctx: &mut TypeContext,
    tokens: &[Token<'_>],
    pos: &mut usize,
) -> Result<TypeId, TypeError> {
    let atom = match tokens.get(*pos) {
        Some(Token::Atom(text)) => *text,
        Some(other) => {
            return Err(TypeError::UnexpectedToken {
                token: token_text(other),
            })
        }
        None => return Err(TypeError::UnexpectedEnd),
    };
    let head = classify(atom)?;
    *pos += 1;

    let mut children = Vec::new();
    if matches!(tokens.get(*pos), Some(Token::Open)) {
        *pos += 1;
        loop {
            match tokens.get(*pos) {
                Some(Token::Close) => {
                    *pos += 1;
                    break;
                }
                Some(_) => children.push(parse_node(ctx, tokens, pos)?),
                None => return Err(TypeError::UnexpectedEnd),
            }
        }
    }

    match head {
        Head::Lambda => {
            let output = children.pop().ok_or_else(|| TypeError::MissingChildren {
                operator: "lambda".to_string(),
            })?;
            Ok(ctx.lambda_type(children, output))
        }
        Head::Application => {
            if children.is_empty() {
                return Err(TypeError::MissingChildren {
                    operator: "application".to_string(),
                });
            }
            let operator = children.remove(0);
            Ok(ctx.application_type(operator, children))
        }
        Head::Union => {
            if children.is_empty() {
                return Err(TypeError::MissingChildren {
                    operator: "union".to_string(),
                });
            }
            Ok(ctx.union_type(children))
        }
        Head::ArgList => {
            if children.len() != 1 {
                return Err(TypeError::ArgListArity {
                    actual: children.len(),
                });
            }
            Ok(ctx.arg_list_type(children[0]))
        }
        head => {
            if !children.is_empty() {
                return Err(TypeError::UnexpectedChildren {
                    token: atom.to_string(),
                });
            }
            Ok(match head {
                Head::Primitive(p) => ctx.primitive_type(p),
                Head::Unknown => ctx.unknown_type(),
                Head::IllFormed => ctx.ill_formed_type(),
                Head::Argument(idx) => ctx.argument_type(idx),
                _ => unreachable!("operator heads handled above"),
            })
        }
    }
}
