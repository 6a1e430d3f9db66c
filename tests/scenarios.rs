//! The six concrete scenarios from the component design's testable-properties section.

mod support;

use ljunwarp::ast::*;
use ljunwarp::error::Result;
use ljunwarp::warp::Warp;
use support::*;

#[test]
fn simple_if_else() -> Result<()> {
    let mut g = Graph::new();
    let head = g.block();
    let then_b = g.block();
    let else_b = g.block();
    let tail = g.block();

    g.stmt(then_b, assign(local(0), num(1.0))).warp(then_b, Warp::Jump(tail));
    g.stmt(else_b, assign(local(0), num(2.0))).warp(else_b, Warp::Flow(tail));
    g.warp(tail, Warp::End);
    g.warp(
        head,
        Warp::Conditional { condition: cmp(BinaryOperatorType::GreaterThan, local(1), num(0.0)), true_target: then_b, false_target: else_b },
    );

    let (mut arena, mut root) = g.finish();
    ljunwarp::unwarp(&mut arena, &mut root)?;

    let stmt = only_statement(&root);
    let Statement::If(if_stmt) = stmt else { panic!("expected If, got {stmt:?}") };
    assert_eq!(if_stmt.expression, cmp(BinaryOperatorType::GreaterThan, local(1), num(0.0)));
    assert_eq!(only_statement(&if_stmt.then_block), &assign(local(0), num(1.0)));
    assert_eq!(only_statement(&if_stmt.else_block), &assign(local(0), num(2.0)));
    Ok(())
}

/// `while i<10 do i=i+1; if i==5 then break end end`. The break materializes as its
/// own one-instruction jump block, immediately below the fallthrough of the test that
/// guards it — the shape a real compiler emits, since a conditional's fallthrough must
/// be whatever's physically next, and only the jump side can reach further away.
#[test]
fn while_with_break() -> Result<()> {
    let mut g = Graph::new();
    let header = g.block();
    let body = g.block();
    let inner_if = g.block();
    let break_jump = g.block();
    let tail = g.block();
    let exit = g.block();

    g.warp(
        header,
        Warp::Conditional { condition: cmp(BinaryOperatorType::LessThan, local(0), num(10.0)), true_target: body, false_target: exit },
    );
    g.stmt(body, assign(local(0), cmp(BinaryOperatorType::Add, local(0), num(1.0)))).warp(body, Warp::Flow(inner_if));
    g.warp(
        inner_if,
        Warp::Conditional { condition: cmp(BinaryOperatorType::Equal, local(0), num(5.0)), true_target: break_jump, false_target: tail },
    );
    g.warp(break_jump, Warp::Jump(exit));
    g.warp(tail, Warp::Jump(header));
    g.warpins(exit, 1);
    g.warp(exit, Warp::End);

    let (mut arena, mut root) = g.finish();
    ljunwarp::unwarp(&mut arena, &mut root)?;

    let stmt = only_statement(&root);
    let Statement::While(while_stmt) = stmt else { panic!("expected While, got {stmt:?}") };
    assert_eq!(while_stmt.expression, cmp(BinaryOperatorType::LessThan, local(0), num(10.0)));
    let statements = while_stmt.statements.as_statements().expect("while body never lifted");
    assert_eq!(statements[0], assign(local(0), cmp(BinaryOperatorType::Add, local(0), num(1.0))));
    let Statement::If(inner) = &statements[1] else { panic!("expected nested If, got {:?}", statements[1]) };
    assert_eq!(only_statement(&inner.then_block), &Statement::Break);
    Ok(())
}

#[test]
fn numeric_for() -> Result<()> {
    let mut g = Graph::new();
    let header = g.block();
    let body = g.block();
    let tail = g.block();
    let after = g.block();

    let index = Identifier { r#type: IdentifierType::Local, slot: 0 };
    g.warp(header, Warp::NumericLoop { index: index.clone(), controls: vec![num(1.0), num(10.0), num(1.0)], body, way_out: after });
    g.stmt(body, print_call(local(0))).warp(body, Warp::Flow(tail));
    g.warp(tail, Warp::Jump(header));
    g.warp(after, Warp::End);

    let (mut arena, mut root) = g.finish();
    ljunwarp::unwarp(&mut arena, &mut root)?;

    let stmt = only_statement(&root);
    let Statement::NumericFor(for_stmt) = stmt else { panic!("expected NumericFor, got {stmt:?}") };
    assert_eq!(for_stmt.variable, index);
    assert_eq!(for_stmt.controls, vec![num(1.0), num(10.0), num(1.0)]);
    assert_eq!(only_statement(&for_stmt.statements), &print_call(local(0)));
    Ok(())
}

fn print_call(arg: Expression) -> Statement {
    // Stands in for a call statement; this core only cares that it's an opaque,
    // non-control-flow statement it must carry through unchanged.
    assign(slot(99), arg)
}

/// `local a = x < 3 or y > 2 and w < 5 and z`, i.e. `x<3 or ((y>2 and w<5) and z)`.
/// Four condition blocks chained into one region with a genuine True/False terminator
/// pair at the end: `y>2` and `w<5` share the same false terminator and the same
/// inversion, so they must coalesce into one `and`-group before the rest of the chain
/// assembles around it, rather than each being folded in as an independent operand.
#[test]
fn short_circuit_expression() -> Result<()> {
    let mut g = Graph::new();
    let head = g.block();
    let mid = g.block();
    let w_check = g.block();
    let z_block = g.block();
    let false_term = g.block();
    let true_term = g.block();
    let tail = g.block();

    // Stored inverted (`x>=3`): the fall-through (`true_target`) must physically be
    // `mid`, so reaching it on the real `x<3` needs the negated test.
    g.warp(
        head,
        Warp::Conditional {
            condition: cmp(BinaryOperatorType::GreaterOrEqual, local(0), num(3.0)),
            true_target: mid,
            false_target: true_term,
        },
    );
    g.warp(
        mid,
        Warp::Conditional { condition: cmp(BinaryOperatorType::GreaterThan, local(1), num(2.0)), true_target: w_check, false_target: false_term },
    );
    g.warp(
        w_check,
        Warp::Conditional { condition: cmp(BinaryOperatorType::LessThan, local(2), num(5.0)), true_target: z_block, false_target: false_term },
    );
    // Stored inverted (`not z`): the fall-through lands on `false_term`, so reaching
    // `true_term` on the real truthy `z` needs the negated test too.
    g.warp(z_block, Warp::Conditional { condition: not(local(3)), true_target: false_term, false_target: true_term });
    g.stmt(false_term, assign(slot(0), primitive(Primitive::False))).warp(false_term, Warp::Jump(tail));
    g.stmt(true_term, assign(slot(0), primitive(Primitive::True))).warp(true_term, Warp::Flow(tail));
    g.warp(tail, Warp::End);

    let (mut arena, mut root) = g.finish();
    ljunwarp::unwarp(&mut arena, &mut root)?;

    let stmt = only_statement(&root);
    let Statement::Assignment(a) = stmt else { panic!("expected Assignment, got {stmt:?}") };
    assert_eq!(a.destinations, vec![slot(0)]);
    let expected = or(
        cmp(BinaryOperatorType::LessThan, local(0), num(3.0)),
        and(and(cmp(BinaryOperatorType::GreaterThan, local(1), num(2.0)), cmp(BinaryOperatorType::LessThan, local(2), num(5.0))), local(3)),
    );
    similar_asserts::assert_eq!(a.expressions, vec![expected]);
    Ok(())
}

/// `repeat if x==0 then y=1; break end until done`. The mid-body break reuses the same
/// dedicated-jump-block shape as `while_with_break`; the tail's own conditional is the
/// `until` expression.
#[test]
fn repeat_until_with_early_break() -> Result<()> {
    let mut g = Graph::new();
    let header = g.block();
    let mid_if = g.block();
    let mid_body = g.block();
    let break_jump = g.block();
    let tail = g.block();
    let after_loop = g.block();

    g.warp(
        header,
        Warp::Conditional { condition: cmp(BinaryOperatorType::Equal, local(0), num(0.0)), true_target: mid_body, false_target: break_jump },
    );
    g.stmt(mid_body, assign(local(1), num(1.0))).warp(mid_body, Warp::Flow(tail));
    g.warp(break_jump, Warp::Jump(after_loop));
    g.warp(
        tail,
        Warp::Conditional { condition: cmp(BinaryOperatorType::Equal, local(2), num(1.0)) /* done */, true_target: after_loop, false_target: header },
    );
    g.warpins(after_loop, 1);
    g.warp(after_loop, Warp::End);

    let (mut arena, mut root) = g.finish();
    ljunwarp::unwarp(&mut arena, &mut root)?;

    let stmt = only_statement(&root);
    let Statement::RepeatUntil(repeat) = stmt else { panic!("expected RepeatUntil, got {stmt:?}") };
    assert_eq!(repeat.expression, cmp(BinaryOperatorType::Equal, local(2), num(1.0)));
    let statements = repeat.statements.as_statements().expect("repeat body never lifted");
    let Statement::If(inner) = &statements[0] else { panic!("expected leading If, got {:?}", statements[0]) };
    let then_statements = inner.then_block.as_statements().expect("if-body never lifted");
    assert_eq!(then_statements[0], assign(local(1), num(1.0)));
    assert_eq!(then_statements[1], Statement::Break);
    Ok(())
}

/// A `while` loop nested inside another, both with their own break, using the
/// dedicated-jump-block break shape throughout. Exercises inner-before-outer loop
/// reduction order and the break-target stack not conflating the two loops' breaks.
#[test]
fn nested_while_both_with_breaks() -> Result<()> {
    let mut g = Graph::new();
    let outer_header = g.block();
    let inner_body = g.block();
    let inner_break_if = g.block();
    let inner_break_jump = g.block();
    let inner_tail = g.block();
    let outer_break_if = g.block();
    let outer_break_jump = g.block();
    let outer_tail = g.block();
    let after = g.block();

    g.warp(
        outer_header,
        Warp::Conditional { condition: cmp(BinaryOperatorType::LessThan, local(0), num(10.0)), true_target: inner_body, false_target: outer_break_jump },
    );
    g.stmt(inner_body, assign(local(0), cmp(BinaryOperatorType::Add, local(0), num(1.0)))).warp(inner_body, Warp::Flow(inner_break_if));
    g.warp(
        inner_break_if,
        Warp::Conditional { condition: cmp(BinaryOperatorType::Equal, local(0), num(5.0)), true_target: inner_break_jump, false_target: inner_tail },
    );
    g.warp(inner_break_jump, Warp::Jump(outer_break_if));
    g.warp(inner_tail, Warp::Jump(outer_header));

    g.warp(
        outer_break_if,
        Warp::Conditional { condition: cmp(BinaryOperatorType::Equal, local(1), num(3.0)), true_target: outer_break_jump, false_target: outer_tail },
    );
    g.warp(outer_break_jump, Warp::Jump(after));
    g.warp(outer_tail, Warp::Jump(outer_header));
    g.warpins(after, 1);
    g.warp(after, Warp::End);

    let (mut arena, mut root) = g.finish();
    ljunwarp::unwarp(&mut arena, &mut root)?;

    let stmt = only_statement(&root);
    let Statement::While(outer) = stmt else { panic!("expected outer While, got {stmt:?}") };
    let outer_statements = outer.statements.as_statements().expect("outer body never lifted");
    assert_eq!(outer_statements.len(), 2, "outer while body: {outer_statements:?}");

    let Statement::If(inner_break) = &outer_statements[0] else { panic!("expected inner While's break-if, got {:?}", outer_statements[0]) };
    similar_asserts::assert_eq!(only_statement(&inner_break.then_block), &Statement::Break);

    let Statement::If(outer_break) = &outer_statements[1] else { panic!("expected the outer break-if, got {:?}", outer_statements[1]) };
    similar_asserts::assert_eq!(only_statement(&outer_break.then_block), &Statement::Break);
    Ok(())
}
