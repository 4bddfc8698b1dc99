use amper::interpreter::{Environment, Interpreter, Value};
use amper::lexer::Token;
use amper::parser::Parser;

fn eval(input: &str) -> Value {
    let tokens = Token::lex(input).expect("lexing failed");
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    assert!(
        parser.errors().is_empty(),
        "unexpected parser errors: {:?}",
        parser.errors()
    );
    let mut interpreter = Interpreter::new();
    let env = Environment::new();
    interpreter.run(&program, &env)
}

fn assert_integer(value: &Value, expected: i64) {
    match value {
        Value::Integer(actual) => assert_eq!(*actual, expected),
        other => panic!("expected INTEGER {expected}, got {other:?}"),
    }
}

#[test]
fn block_scope_assignment_reaches_outer_names() {
    let input = "
        let x = 5;
        if (true) {
            let y = 99;
            x = x + y;
        };
        x;
    ";
    assert_integer(&eval(input), 104);
}

#[test]
fn block_locals_do_not_leak_outward() {
    let input = "
        let x = 2 * 2;
        if (true) {
            let y = x + 8;
        };
        x;
    ";
    assert_integer(&eval(input), 4);

    match eval("if (true) { let y = 1; }; y") {
        Value::Error(message) => assert_eq!(message, "identifier not found: y"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn block_let_shadows_without_overwriting() {
    let input = "
        let x = 10;
        if (true) {
            let x = 99;
        }
        x;
    ";
    assert_integer(&eval(input), 10);
}

#[test]
fn double_let_in_the_same_scope_is_an_error() {
    match eval("let x = 5; let f = fnc() { x }; let x = 99;") {
        Value::Error(message) => assert_eq!(message, "Variable already initialized: x"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn closures_capture_their_definition_environment() {
    let input = "
        let outerVal = 50;
        let makeAdder = fnc() {
            return fnc(x) { x + outerVal };
        };
        let addOuter = makeAdder();
        addOuter(10);
    ";
    assert_integer(&eval(input), 60);
}

#[test]
fn closure_sees_definition_site_not_call_site() {
    let input = "
        let x = 5;
        let f = fnc() { x };
        let g = fnc() {
            let x = 99;
            f()
        };
        g()
    ";
    assert_integer(&eval(input), 5);
}

#[test]
fn function_locals_shadow_outer_bindings() {
    let input = "
        let x = 5
        let fn = fnc() {
            let x = 999;
            return x;
        };
        fn()
    ";
    assert_integer(&eval(input), 999);
}

#[test]
fn closures_can_mutate_captured_bindings() {
    let input = "
        let x = 10;
        let fn = fnc() {
            x = x + 1;
        };
        fn();
        x;
    ";
    assert_integer(&eval(input), 11);
}

#[test]
fn return_inside_a_block_exits_the_function() {
    let input = "
        let fn = fnc() {
            let a = 10;
            if (true) {
                let b = a + 5;
                return b;
                a = 999;
            }
        };
        fn();
    ";
    assert_integer(&eval(input), 15);
}

#[test]
fn while_body_blocks_get_a_fresh_scope_each_iteration() {
    let input = "
        let i = 0;
        while (i < 5) {
            if (true) {
                let temp = i;
                i = temp + 2;
            }
        }
        i;
    ";
    assert_integer(&eval(input), 6);
}

#[test]
fn while_body_lets_do_not_collide_across_iterations() {
    let input = "
        let i = 0;
        while (i < 3) {
            let step = 1;
            i = i + step;
        }
        i
    ";
    assert_integer(&eval(input), 3);
}

#[test]
fn counter_closures_share_one_environment() {
    let input = "
        let makeCounter = fnc() {
            let count = 0;
            fnc() {
                count = count + 1;
                count
            }
        };
        let tick = makeCounter();
        tick();
        tick();
        tick()
    ";
    assert_integer(&eval(input), 3);
}
