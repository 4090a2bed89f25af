// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parser for the traversal query language using nom parsers over tokens
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! document   := statement (';' statement)* [';']
//! statement  := $var '=' set_query | set_query
//! set_query  := piped ((UNION [ALL|DISTINCT] | MINUS | INTERSECT) piped)*
//! piped      := term ('|' term)*
//! term       := '(' set_query ')' | go | find_path | yield
//! ```
//!
//! Expressions: OR, XOR, AND, NOT, comparison (including CONTAINS, `=~` and
//! IS [NOT] NULL), additive, multiplicative, unary minus, primary.

use log::debug;
use nom::{
    branch::alt,
    combinator::{cut, map, map_res, opt},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use super::ast::*;
use super::lexer::{tokenize, Token};

type TokenResult<'a, T> = IResult<&'a [Token], T>;

/// Parser error type
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Lexer error: {0}")]
    LexerError(String),
    #[error("Unexpected token: {0:?}")]
    UnexpectedToken(Token),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Empty query")]
    EmptyQuery,
    #[error("Incomplete {0} operation. Expected a query after {0}")]
    IncompleteSetOperation(String),
}

/// Parse a query text into an AST Document
pub fn parse_query(input: &str) -> Result<Document, ParserError> {
    let tokens = tokenize(input).map_err(ParserError::LexerError)?;

    let mut remaining: &[Token] = &tokens;
    let mut statements = Vec::new();

    loop {
        while matches!(remaining.first(), Some(Token::Semicolon)) {
            remaining = &remaining[1..];
        }
        if matches!(remaining.first(), Some(Token::EOF) | None) {
            break;
        }

        match statement(remaining) {
            Ok((rest, stmt)) => {
                statements.push(stmt);
                remaining = rest;
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(error_at(e.input));
            }
            Err(nom::Err::Incomplete(_)) => return Err(ParserError::UnexpectedEof),
        }

        match remaining.first() {
            Some(Token::Semicolon) | Some(Token::EOF) | None => {}
            Some(_) => return Err(error_at(remaining)),
        }
    }

    if statements.is_empty() {
        return Err(ParserError::EmptyQuery);
    }

    debug!("Parsed {} statement(s)", statements.len());
    Ok(Document { statements })
}

fn error_at(tokens: &[Token]) -> ParserError {
    match tokens.first() {
        None | Some(Token::EOF) => ParserError::UnexpectedEof,
        Some(Token::Union) => ParserError::IncompleteSetOperation("UNION".to_string()),
        Some(Token::Minus) => ParserError::IncompleteSetOperation("MINUS".to_string()),
        Some(Token::Intersect) => ParserError::IncompleteSetOperation("INTERSECT".to_string()),
        Some(token) => ParserError::UnexpectedToken(token.clone()),
    }
}

fn fail<T>(tokens: &[Token]) -> TokenResult<'_, T> {
    Err(nom::Err::Error(nom::error::Error::new(
        tokens,
        nom::error::ErrorKind::Tag,
    )))
}

/// Match a token by variant
fn expect_token(expected: Token) -> impl Fn(&[Token]) -> TokenResult<'_, Token> {
    move |tokens: &[Token]| match tokens.first() {
        Some(token) if std::mem::discriminant(token) == std::mem::discriminant(&expected) => {
            Ok((&tokens[1..], token.clone()))
        }
        _ => fail(tokens),
    }
}

fn statement(tokens: &[Token]) -> TokenResult<'_, Statement> {
    alt((
        map(
            tuple((variable_name, expect_token(Token::Assign), cut(set_query))),
            |(variable, _, query)| Statement::Assignment { variable, query },
        ),
        map(set_query, Statement::Query),
    ))(tokens)
}

fn variable_name(tokens: &[Token]) -> TokenResult<'_, String> {
    match tokens.first() {
        Some(Token::Variable(name)) => Ok((&tokens[1..], name.clone())),
        _ => fail(tokens),
    }
}

/// Parse set operations; all operators share one precedence level, left to right
fn set_query(tokens: &[Token]) -> TokenResult<'_, Query> {
    let (mut remaining, mut left) = piped_query(tokens)?;

    loop {
        match tuple((set_operator, piped_query))(remaining) {
            Ok((rest, (operation, right))) => {
                left = Query::SetOperation(SetOperation {
                    left: Box::new(left),
                    operation,
                    right: Box::new(right),
                });
                remaining = rest;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    Ok((remaining, left))
}

fn set_operator(tokens: &[Token]) -> TokenResult<'_, SetOperationType> {
    alt((
        map(
            tuple((expect_token(Token::Union), expect_token(Token::All))),
            |_| SetOperationType::UnionAll,
        ),
        map(
            tuple((
                expect_token(Token::Union),
                opt(expect_token(Token::Distinct)),
            )),
            |_| SetOperationType::Union,
        ),
        map(expect_token(Token::Minus), |_| SetOperationType::Minus),
        map(expect_token(Token::Intersect), |_| SetOperationType::Intersect),
    ))(tokens)
}

/// Parse `term | term | ...`, binding tighter than set operations
fn piped_query(tokens: &[Token]) -> TokenResult<'_, Query> {
    let (mut remaining, mut left) = query_term(tokens)?;

    loop {
        match preceded(expect_token(Token::Pipe), cut(query_term))(remaining) {
            Ok((rest, right)) => {
                left = Query::Pipe {
                    left: Box::new(left),
                    right: Box::new(right),
                };
                remaining = rest;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    Ok((remaining, left))
}

fn query_term(tokens: &[Token]) -> TokenResult<'_, Query> {
    alt((
        delimited(
            expect_token(Token::LeftParen),
            set_query,
            cut(expect_token(Token::RightParen)),
        ),
        map(go_statement, Query::Go),
        map(find_path_statement, Query::FindPath),
        map(yield_statement, Query::Yield),
    ))(tokens)
}

/// GO [steps] FROM <source> OVER <edges> [WHERE <expr>] [YIELD <cols>]
fn go_statement(tokens: &[Token]) -> TokenResult<'_, GoStatement> {
    let (tokens, _) = expect_token(Token::Go)(tokens)?;
    cut(go_body)(tokens)
}

fn go_body(tokens: &[Token]) -> TokenResult<'_, GoStatement> {
    let (tokens, steps) = opt(step_range)(tokens)?;
    let (tokens, _) = expect_token(Token::From)(tokens)?;
    let (tokens, from) = vertex_source(tokens)?;
    let (tokens, over) = over_clause(tokens)?;
    let (tokens, where_clause) = opt(where_clause)(tokens)?;
    let (tokens, yield_clause) = opt(yield_clause)(tokens)?;

    Ok((
        tokens,
        GoStatement {
            steps,
            from,
            over,
            where_clause,
            yield_clause,
        },
    ))
}

/// `n STEPS` or `m TO n STEPS`
fn step_range(tokens: &[Token]) -> TokenResult<'_, StepRange> {
    let (tokens, min) = step_count(tokens)?;
    let (tokens, max) = opt(preceded(expect_token(Token::To), step_count))(tokens)?;
    let (tokens, _) = expect_token(Token::Steps)(tokens)?;
    Ok((
        tokens,
        StepRange {
            min,
            max: max.unwrap_or(min),
        },
    ))
}

fn step_count(tokens: &[Token]) -> TokenResult<'_, u32> {
    map_res(integer, u32::try_from)(tokens)
}

fn integer(tokens: &[Token]) -> TokenResult<'_, u64> {
    match tokens.first() {
        Some(Token::Integer(i)) => Ok((&tokens[1..], *i)),
        _ => fail(tokens),
    }
}

/// FIND SHORTEST|ALL PATH FROM <source> TO <source> OVER <edges> [UPTO n STEPS]
fn find_path_statement(tokens: &[Token]) -> TokenResult<'_, FindPathStatement> {
    let (tokens, _) = expect_token(Token::Find)(tokens)?;
    cut(find_path_body)(tokens)
}

fn find_path_body(tokens: &[Token]) -> TokenResult<'_, FindPathStatement> {
    let (tokens, mode) = alt((
        map(expect_token(Token::Shortest), |_| PathMode::Shortest),
        map(expect_token(Token::All), |_| PathMode::All),
    ))(tokens)?;
    let (tokens, _) = expect_token(Token::Path)(tokens)?;
    let (tokens, _) = expect_token(Token::From)(tokens)?;
    let (tokens, from) = vertex_source(tokens)?;
    let (tokens, _) = expect_token(Token::To)(tokens)?;
    let (tokens, to) = vertex_source(tokens)?;
    let (tokens, over) = over_clause(tokens)?;
    let (tokens, upto) = opt(delimited(
        expect_token(Token::Upto),
        step_count,
        expect_token(Token::Steps),
    ))(tokens)?;

    Ok((
        tokens,
        FindPathStatement {
            mode,
            from,
            to,
            over,
            upto,
        },
    ))
}

/// YIELD [DISTINCT] <cols> [WHERE <expr>]
fn yield_statement(tokens: &[Token]) -> TokenResult<'_, YieldStatement> {
    let (tokens, yield_clause) = yield_clause(tokens)?;
    let (tokens, where_clause) = opt(where_clause)(tokens)?;
    Ok((
        tokens,
        YieldStatement {
            yield_clause,
            where_clause,
        },
    ))
}

fn vertex_source(tokens: &[Token]) -> TokenResult<'_, VertexSource> {
    alt((
        map(column_reference, |(source, column)| VertexSource::Column {
            source,
            column,
        }),
        map(input_source, VertexSource::Input),
        map(
            separated_list1(expect_token(Token::Comma), expression),
            VertexSource::Ids,
        ),
    ))(tokens)
}

fn input_source(tokens: &[Token]) -> TokenResult<'_, InputSource> {
    match tokens.first() {
        Some(Token::InputRef) => Ok((&tokens[1..], InputSource::Pipe)),
        Some(Token::Variable(name)) => Ok((&tokens[1..], InputSource::Variable(name.clone()))),
        _ => fail(tokens),
    }
}

/// `$-.col` or `$var.col`
fn column_reference(tokens: &[Token]) -> TokenResult<'_, (InputSource, String)> {
    map(
        tuple((input_source, expect_token(Token::Dot), name)),
        |(source, _, column)| (source, column),
    )(tokens)
}

fn over_clause(tokens: &[Token]) -> TokenResult<'_, OverClause> {
    let (tokens, _) = expect_token(Token::Over)(tokens)?;
    let (tokens, edge_types) = alt((
        map(expect_token(Token::Star), |_| EdgeTypeList::All),
        map(
            separated_list1(expect_token(Token::Comma), name),
            EdgeTypeList::Named,
        ),
    ))(tokens)?;
    let (tokens, direction) = opt(alt((
        map(expect_token(Token::Reversely), |_| Direction::Reversely),
        map(expect_token(Token::Bidirect), |_| Direction::Bidirect),
    )))(tokens)?;

    Ok((
        tokens,
        OverClause {
            edge_types,
            direction: direction.unwrap_or(Direction::Forward),
        },
    ))
}

fn where_clause(tokens: &[Token]) -> TokenResult<'_, Expression> {
    preceded(expect_token(Token::Where), cut(expression))(tokens)
}

fn yield_clause(tokens: &[Token]) -> TokenResult<'_, YieldClause> {
    let (tokens, _) = expect_token(Token::Yield)(tokens)?;
    let (tokens, distinct) = opt(expect_token(Token::Distinct))(tokens)?;
    let (tokens, columns) =
        cut(separated_list1(expect_token(Token::Comma), yield_column))(tokens)?;
    Ok((
        tokens,
        YieldClause {
            distinct: distinct.is_some(),
            columns,
        },
    ))
}

fn yield_column(tokens: &[Token]) -> TokenResult<'_, YieldColumn> {
    alt((
        map(
            tuple((
                input_source,
                expect_token(Token::Dot),
                expect_token(Token::Star),
            )),
            |(source, _, _)| YieldColumn::Wildcard(source),
        ),
        map(
            tuple((
                expression,
                opt(preceded(expect_token(Token::As), cut(name))),
            )),
            |(expression, alias)| YieldColumn::Expression { expression, alias },
        ),
    ))(tokens)
}

/// Identifier, or a keyword used as a name after `.` / `AS` / `OVER`
fn name(tokens: &[Token]) -> TokenResult<'_, String> {
    match tokens.first() {
        Some(Token::Identifier(s)) => Ok((&tokens[1..], s.clone())),
        Some(token) => match token.keyword_text() {
            Some(text) => Ok((&tokens[1..], text.to_ascii_lowercase())),
            None => fail(tokens),
        },
        None => fail(tokens),
    }
}

fn identifier(tokens: &[Token]) -> TokenResult<'_, String> {
    match tokens.first() {
        Some(Token::Identifier(s)) => Ok((&tokens[1..], s.clone())),
        _ => fail(tokens),
    }
}

pub(crate) fn expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    or_expression(tokens)
}

fn fold_binary(first: Expression, rest: Vec<(BinaryOperator, Expression)>) -> Expression {
    rest.into_iter()
        .fold(first, |left, (operator, right)| {
            Expression::binary(left, operator, right)
        })
}

/// Parse OR expressions: xor_expr OR xor_expr
fn or_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    map(
        tuple((
            xor_expression,
            many0(tuple((
                map(expect_token(Token::Or), |_| BinaryOperator::Or),
                xor_expression,
            ))),
        )),
        |(first, rest)| fold_binary(first, rest),
    )(tokens)
}

/// Parse XOR expressions: and_expr XOR and_expr
fn xor_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    map(
        tuple((
            and_expression,
            many0(tuple((
                map(expect_token(Token::Xor), |_| BinaryOperator::Xor),
                and_expression,
            ))),
        )),
        |(first, rest)| fold_binary(first, rest),
    )(tokens)
}

/// Parse AND expressions: not_expr AND not_expr
fn and_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    map(
        tuple((
            not_expression,
            many0(tuple((
                map(expect_token(Token::And), |_| BinaryOperator::And),
                not_expression,
            ))),
        )),
        |(first, rest)| fold_binary(first, rest),
    )(tokens)
}

/// Parse NOT expressions: [NOT|!] comparison
fn not_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    alt((
        map(
            preceded(
                alt((expect_token(Token::Not), expect_token(Token::Bang))),
                not_expression,
            ),
            |expr| Expression::unary(UnaryOperator::Not, expr),
        ),
        comparison,
    ))(tokens)
}

/// Parse comparisons and IS [NOT] NULL suffixes, left to right
fn comparison(tokens: &[Token]) -> TokenResult<'_, Expression> {
    let (mut remaining, mut left) = additive_expression(tokens)?;

    loop {
        if let Ok((rest, (operator, right))) =
            tuple((comparison_operator, additive_expression))(remaining)
        {
            left = Expression::binary(left, operator, right);
            remaining = rest;
            continue;
        }
        if let Ok((rest, negated)) = is_null_suffix(remaining) {
            left = Expression::IsNull(IsNullExpression {
                expression: Box::new(left),
                negated,
            });
            remaining = rest;
            continue;
        }
        break;
    }

    Ok((remaining, left))
}

fn comparison_operator(tokens: &[Token]) -> TokenResult<'_, BinaryOperator> {
    let operator = match tokens.first() {
        Some(Token::Equal) => BinaryOperator::Equal,
        Some(Token::NotEqual) => BinaryOperator::NotEqual,
        Some(Token::LessThan) => BinaryOperator::LessThan,
        Some(Token::LessEqual) => BinaryOperator::LessEqual,
        Some(Token::GreaterThan) => BinaryOperator::GreaterThan,
        Some(Token::GreaterEqual) => BinaryOperator::GreaterEqual,
        Some(Token::Contains) => BinaryOperator::Contains,
        Some(Token::Regex) => BinaryOperator::Regex,
        _ => return fail(tokens),
    };
    Ok((&tokens[1..], operator))
}

fn is_null_suffix(tokens: &[Token]) -> TokenResult<'_, bool> {
    map(
        tuple((
            expect_token(Token::Is),
            opt(expect_token(Token::Not)),
            expect_token(Token::Null),
        )),
        |(_, not, _)| not.is_some(),
    )(tokens)
}

/// Parse additive expressions: term (+|-) term
fn additive_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    map(
        tuple((
            multiplicative_expression,
            many0(tuple((
                alt((
                    map(expect_token(Token::Plus), |_| BinaryOperator::Plus),
                    map(expect_token(Token::Dash), |_| BinaryOperator::Minus),
                )),
                multiplicative_expression,
            ))),
        )),
        |(first, rest)| fold_binary(first, rest),
    )(tokens)
}

/// Parse multiplicative expressions: unary (*|/|%) unary
fn multiplicative_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    map(
        tuple((
            unary_expression,
            many0(tuple((
                alt((
                    map(expect_token(Token::Star), |_| BinaryOperator::Star),
                    map(expect_token(Token::Slash), |_| BinaryOperator::Slash),
                    map(expect_token(Token::Percent), |_| BinaryOperator::Percent),
                )),
                unary_expression,
            ))),
        )),
        |(first, rest)| fold_binary(first, rest),
    )(tokens)
}

fn unary_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    alt((
        negative_integer,
        map(
            preceded(expect_token(Token::Dash), unary_expression),
            |expr| match expr {
                Expression::Literal(Literal::Integer(i)) if i != i64::MIN => {
                    Expression::Literal(Literal::Integer(-i))
                }
                Expression::Literal(Literal::Float(d)) => Expression::Literal(Literal::Float(-d)),
                other => Expression::unary(UnaryOperator::Negate, other),
            },
        ),
        primary_expression,
    ))(tokens)
}

/// `-` directly before an integer is part of the literal, so i64::MIN is expressible
fn negative_integer(tokens: &[Token]) -> TokenResult<'_, Expression> {
    match tokens {
        [Token::Dash, Token::Integer(magnitude), rest @ ..] => match 0i64.checked_sub_unsigned(*magnitude) {
            Some(value) => Ok((rest, Expression::Literal(Literal::Integer(value)))),
            None => fail(tokens),
        },
        _ => fail(tokens),
    }
}

fn primary_expression(tokens: &[Token]) -> TokenResult<'_, Expression> {
    alt((
        map(literal, Expression::Literal),
        map(
            delimited(
                expect_token(Token::LeftBracket),
                separated_list0(expect_token(Token::Comma), expression),
                expect_token(Token::RightBracket),
            ),
            Expression::List,
        ),
        delimited(
            expect_token(Token::LeftParen),
            expression,
            expect_token(Token::RightParen),
        ),
        map(property_reference, Expression::Property),
    ))(tokens)
}

fn literal(tokens: &[Token]) -> TokenResult<'_, Literal> {
    let literal = match tokens.first() {
        Some(Token::Null) => Literal::Null,
        Some(Token::Boolean(b)) => Literal::Boolean(*b),
        Some(Token::Integer(i)) => match i64::try_from(*i) {
            Ok(i) => Literal::Integer(i),
            Err(_) => return fail(tokens),
        },
        Some(Token::Float(d)) => Literal::Float(*d),
        Some(Token::String(s)) => Literal::String(s.clone()),
        _ => return fail(tokens),
    };
    Ok((&tokens[1..], literal))
}

fn property_reference(tokens: &[Token]) -> TokenResult<'_, PropertyRef> {
    alt((
        map(
            tuple((
                expect_token(Token::SourceRef),
                expect_token(Token::Dot),
                name,
                expect_token(Token::Dot),
                name,
            )),
            |(_, _, tag, _, property)| PropertyRef::Source { tag, property },
        ),
        map(
            tuple((
                expect_token(Token::DestinationRef),
                expect_token(Token::Dot),
                name,
                expect_token(Token::Dot),
                name,
            )),
            |(_, _, tag, _, property)| PropertyRef::Destination { tag, property },
        ),
        map(expect_token(Token::SourceRef), |_| PropertyRef::SourceVertex),
        map(expect_token(Token::DestinationRef), |_| {
            PropertyRef::DestinationVertex
        }),
        map(column_reference, |(source, column)| PropertyRef::Input {
            source,
            column,
        }),
        map(
            tuple((identifier, expect_token(Token::Dot), name)),
            |(edge_type, _, property)| PropertyRef::Edge {
                edge_type,
                property,
            },
        ),
        map(identifier, PropertyRef::EdgeValue),
    ))(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_query(text: &str) -> Query {
        let mut document = parse_query(text).unwrap();
        assert_eq!(document.statements.len(), 1);
        match document.statements.remove(0) {
            Statement::Query(query) => query,
            other => panic!("expected query, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_go() {
        let Query::Go(go) = single_query("GO FROM \"Tim Duncan\" OVER like") else {
            panic!("expected GO");
        };
        assert!(go.steps.is_none());
        assert_eq!(go.over.edge_types, EdgeTypeList::Named(vec!["like".to_string()]));
        assert_eq!(go.over.direction, Direction::Forward);
        assert!(matches!(go.from, VertexSource::Ids(ref ids) if ids.len() == 1));
        assert!(go.yield_clause.is_none());
    }

    #[test]
    fn test_parse_go_with_everything() {
        let query = single_query(
            "GO 1 TO 3 STEPS FROM $-.id OVER like, serve REVERSELY \
             WHERE like.likeness > 90 AND $^.player.age >= 30 \
             YIELD DISTINCT $$.player.name AS name, like._dst",
        );
        let Query::Go(go) = query else {
            panic!("expected GO");
        };
        assert_eq!(go.steps, Some(StepRange { min: 1, max: 3 }));
        assert!(matches!(
            go.from,
            VertexSource::Column { source: InputSource::Pipe, ref column } if column == "id"
        ));
        assert_eq!(go.over.direction, Direction::Reversely);
        let where_clause = go.where_clause.unwrap();
        assert_eq!(
            where_clause.to_string(),
            "((like.likeness>90) AND ($^.player.age>=30))"
        );
        let yield_clause = go.yield_clause.unwrap();
        assert!(yield_clause.distinct);
        assert_eq!(yield_clause.columns.len(), 2);
        assert!(matches!(
            &yield_clause.columns[0],
            YieldColumn::Expression { alias: Some(alias), .. } if alias == "name"
        ));
    }

    #[test]
    fn test_parse_find_path() {
        let Query::FindPath(find) = single_query(
            "FIND SHORTEST PATH FROM \"Tim Duncan\" TO \"Tony Parker\", \"Yao Ming\" OVER * UPTO 4 STEPS",
        ) else {
            panic!("expected FIND PATH");
        };
        assert_eq!(find.mode, PathMode::Shortest);
        assert_eq!(find.over.edge_types, EdgeTypeList::All);
        assert_eq!(find.upto, Some(4));
        assert!(matches!(find.to, VertexSource::Ids(ref ids) if ids.len() == 2));
    }

    #[test]
    fn test_pipe_binds_tighter_than_set_operations() {
        let query = single_query(
            "GO FROM 1 OVER e UNION ALL GO FROM 2 OVER e | GO FROM $-.id OVER e",
        );
        let Query::SetOperation(set_op) = query else {
            panic!("expected set operation");
        };
        assert_eq!(set_op.operation, SetOperationType::UnionAll);
        assert!(matches!(*set_op.left, Query::Go(_)));
        assert!(matches!(*set_op.right, Query::Pipe { .. }));
    }

    #[test]
    fn test_set_operations_are_left_associative() {
        let query = single_query(
            "GO FROM 1 OVER e MINUS GO FROM 2 OVER e UNION GO FROM 3 OVER e INTERSECT GO FROM 4 OVER e",
        );
        let Query::SetOperation(outer) = query else {
            panic!("expected set operation");
        };
        assert_eq!(outer.operation, SetOperationType::Intersect);
        let Query::SetOperation(middle) = *outer.left else {
            panic!("expected nested set operation");
        };
        assert_eq!(middle.operation, SetOperationType::Union);
        assert!(matches!(
            *middle.left,
            Query::SetOperation(SetOperation { operation: SetOperationType::Minus, .. })
        ));
    }

    #[test]
    fn test_parenthesized_pipe_input() {
        let query = single_query(
            "(GO FROM 1 OVER e UNION DISTINCT GO FROM 2 OVER e) | GO FROM $- OVER e",
        );
        let Query::Pipe { left, right } = query else {
            panic!("expected pipe");
        };
        assert!(matches!(
            *left,
            Query::SetOperation(SetOperation { operation: SetOperationType::Union, .. })
        ));
        let Query::Go(go) = *right else {
            panic!("expected GO");
        };
        assert!(matches!(go.from, VertexSource::Input(InputSource::Pipe)));
    }

    #[test]
    fn test_multi_statement_document() {
        let document = parse_query(
            "$a = GO FROM 1 OVER e YIELD e._dst AS id; \
             GO FROM $a.id OVER e YIELD $a.*, e._dst;",
        )
        .unwrap();
        assert_eq!(document.statements.len(), 2);
        assert!(matches!(
            &document.statements[0],
            Statement::Assignment { variable, .. } if variable == "a"
        ));
        let Statement::Query(Query::Go(go)) = &document.statements[1] else {
            panic!("expected GO");
        };
        let columns = &go.yield_clause.as_ref().unwrap().columns;
        assert!(matches!(
            &columns[0],
            YieldColumn::Wildcard(InputSource::Variable(name)) if name == "a"
        ));
    }

    #[test]
    fn test_standalone_yield() {
        let Query::Yield(stmt) = single_query("YIELD \"Tim Duncan\" AS vid, -1 + 2 * 3 WHERE true") else {
            panic!("expected YIELD");
        };
        assert_eq!(stmt.yield_clause.columns.len(), 2);
        let YieldColumn::Expression { expression, .. } = &stmt.yield_clause.columns[1] else {
            panic!("expected expression column");
        };
        assert_eq!(expression.to_string(), "(-1+(2*3))");
        assert!(stmt.where_clause.is_some());
    }

    #[test]
    fn test_expression_forms() {
        let Query::Yield(stmt) = single_query(
            "YIELD $-.name CONTAINS \"Tim\" OR NOT $-.x IS NULL XOR $-.y =~ \"^T.*\", [1, 2.5, 'a'], like",
        ) else {
            panic!("expected YIELD");
        };
        let YieldColumn::Expression { expression, .. } = &stmt.yield_clause.columns[0] else {
            panic!("expected expression column");
        };
        assert_eq!(
            expression.to_string(),
            "(($-.name CONTAINS \"Tim\") OR (!($-.x IS NULL) XOR ($-.y=~\"^T.*\")))"
        );
        let YieldColumn::Expression { expression, .. } = &stmt.yield_clause.columns[2] else {
            panic!("expected expression column");
        };
        assert_eq!(
            expression,
            &Expression::Property(PropertyRef::EdgeValue("like".to_string()))
        );
    }

    #[test]
    fn test_integer_literal_bounds() {
        let Query::Yield(stmt) = single_query(
            "YIELD -9223372036854775808 AS lo, 9223372036854775807 AS hi, -(-3) AS x",
        ) else {
            panic!("expected YIELD");
        };
        let expressions: Vec<&Expression> = stmt
            .yield_clause
            .columns
            .iter()
            .map(|column| match column {
                YieldColumn::Expression { expression, .. } => expression,
                other => panic!("expected expression column, got {:?}", other),
            })
            .collect();
        assert_eq!(expressions[0], &Expression::Literal(Literal::Integer(i64::MIN)));
        assert_eq!(expressions[1], &Expression::Literal(Literal::Integer(i64::MAX)));
        assert_eq!(expressions[2], &Expression::Literal(Literal::Integer(3)));

        assert!(parse_query("YIELD 9223372036854775808 AS x").is_err());
        assert!(parse_query("YIELD -9223372036854775809 AS x").is_err());
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse_query(""), Err(ParserError::EmptyQuery)));
        assert!(matches!(parse_query(";;"), Err(ParserError::EmptyQuery)));
        assert!(matches!(
            parse_query("GO FROM 1 OVER e UNION"),
            Err(ParserError::IncompleteSetOperation(_))
        ));
        assert!(matches!(
            parse_query("GO FROM 1 like"),
            Err(ParserError::UnexpectedToken(Token::Identifier(_)))
        ));
        assert!(matches!(
            parse_query("GO FROM 1 OVER"),
            Err(ParserError::UnexpectedEof)
        ));
        assert!(matches!(
            parse_query("GO FROM 1 OVER e garbage"),
            Err(ParserError::UnexpectedToken(_))
        ));
        assert!(matches!(
            parse_query("FIND PATH FROM 1 TO 2 OVER e"),
            Err(ParserError::UnexpectedToken(Token::Path))
        ));
        assert!(parse_query("GO FROM \"a").is_err());
    }
}
