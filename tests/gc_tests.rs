use amper::interpreter::{Env, Environment, Interpreter, Value};
use amper::lexer::Token;
use amper::parser::Parser;

fn run(input: &str) -> (Value, Interpreter, Env) {
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
    let value = interpreter.run(&program, &env);
    (value, interpreter, env)
}

fn assert_integer(value: &Value, expected: i64) {
    match value {
        Value::Integer(actual) => assert_eq!(*actual, expected),
        other => panic!("expected INTEGER {expected}, got {other:?}"),
    }
}

#[test]
fn transient_allocations_are_collected() {
    let input = "
        let i = 0;
        while (i < 100) {
            &32;
            i = i + 1;
        }
    ";
    let (_, interpreter, _) = run(input);
    assert_eq!(interpreter.heap_size(), 0);
}

#[test]
fn rooted_pointer_survives_a_churning_loop() {
    let input = "
        let x = &64;
        let i = 0;
        while (i < 100) {
            &32;
            i = i + 1;
        }
    ";
    let (_, interpreter, _) = run(input);
    assert_eq!(interpreter.heap_size(), 1);
}

#[test]
fn rooted_pointer_still_dereferences_after_collections() {
    let input = "
        let x = &64;
        let i = 0;
        while (i < 100) {
            &32;
            i = i + 1;
        }
        *x
    ";
    let (value, interpreter, _) = run(input);
    assert_integer(&value, 64);
    assert_eq!(interpreter.heap_size(), 1);
}

#[test]
fn pointers_inside_arrays_are_traced() {
    let input = "
        let ptrs = [&1, &2, &3];
        let i = 0;
        while (i < 50) {
            &32;
            i = i + 1;
        }
        *ptrs[0] + *ptrs[1] + *ptrs[2]
    ";
    let (value, interpreter, _) = run(input);
    assert_integer(&value, 6);
    assert_eq!(interpreter.heap_size(), 3);
}

#[test]
fn pointers_inside_hashes_are_traced() {
    let input = "
        let table = {\"p\": &7};
        let i = 0;
        while (i < 50) {
            &32;
            i = i + 1;
        }
        *table[\"p\"]
    ";
    let (value, interpreter, _) = run(input);
    assert_integer(&value, 7);
    assert_eq!(interpreter.heap_size(), 1);
}

#[test]
fn closure_held_cells_survive() {
    let input = "
        let make = fnc() {
            let boxed = &99;
            fnc() { *boxed }
        };
        let f = make();
        let i = 0;
        while (i < 50) {
            &32;
            i = i + 1;
        }
        f()
    ";
    let (value, interpreter, _) = run(input);
    assert_integer(&value, 99);
    assert_eq!(interpreter.heap_size(), 1);
}

#[test]
fn dropping_the_last_closure_reference_reclaims_its_cells() {
    let input = "
        let make = fnc() {
            let boxed = &99;
            fnc() { *boxed }
        };
        let f = make();
        let witnessed = f();
        f = 0;
        witnessed
    ";
    let (value, interpreter, _) = run(input);
    assert_integer(&value, 99);
    assert_eq!(interpreter.heap_size(), 0);
}

#[test]
fn pointer_chains_stay_intact() {
    let input = "
        let inner = &5;
        let outer = &inner;
        let i = 0;
        while (i < 50) {
            &32;
            i = i + 1;
        }
        **outer
    ";
    let (value, interpreter, _) = run(input);
    assert_integer(&value, 5);
    assert_eq!(interpreter.heap_size(), 2);
}

#[test]
fn overwriting_through_a_pointer_keeps_the_cell_live() {
    let input = "
        let p = &1;
        *p = &2;
        let i = 0;
        while (i < 50) {
            &32;
            i = i + 1;
        }
        **p
    ";
    let (value, interpreter, _) = run(input);
    assert_integer(&value, 2);
    // The cell for &2 is reachable only through p's cell.
    assert_eq!(interpreter.heap_size(), 2);
}

#[test]
fn heap_state_persists_across_runs_with_a_shared_environment() {
    let tokens = Token::lex("let p = &41;").expect("lexing failed");
    let mut parser = Parser::new(tokens);
    let first = parser.parse_program();
    assert!(parser.errors().is_empty());

    let tokens = Token::lex("*p = *p + 1; *p").expect("lexing failed");
    let mut parser = Parser::new(tokens);
    let second = parser.parse_program();
    assert!(parser.errors().is_empty());

    let mut interpreter = Interpreter::new();
    let env = Environment::new();
    interpreter.run(&first, &env);
    assert_eq!(interpreter.heap_size(), 1);

    let value = interpreter.run(&second, &env);
    assert_integer(&value, 42);
    assert_eq!(interpreter.heap_size(), 1);
}

#[test]
fn custom_threshold_still_collects_transients() {
    let tokens = Token::lex("let i = 0; while (i < 10) { &1; i = i + 1; }").expect("lexing failed");
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    assert!(parser.errors().is_empty());

    let mut interpreter = Interpreter::with_gc_threshold(3);
    let env = Environment::new();
    interpreter.run(&program, &env);
    assert_eq!(interpreter.heap_size(), 0);
}
