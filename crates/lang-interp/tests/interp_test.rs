// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end script behavior through the public API.

use std::sync::atomic::Ordering;

use lang_interp::{DataObject, DataValue, Interpreter, InterpretingError, LangConfig};

fn run(source: &str) -> (Interpreter, String) {
    let (mut interp, output) = Interpreter::with_captured_output();
    interp.run_str(source);
    let text = output.lock().unwrap().clone();
    (interp, text)
}

fn var(interp: &Interpreter, name: &str) -> String {
    interp.get_var(name).map(|v| v.to_text()).unwrap_or_default()
}

#[test]
fn longest_variable_prefix() {
    let (interp, out) = run("$ab = 1\n$abc = 2\nfunc.println($abc)\nfunc.println($abd)");
    assert_eq!(out, "2\n1d\n");
    assert_eq!(var(&interp, "$abc"), "2");
}

#[test]
fn int_arithmetic_and_errno() {
    let (interp, _) = run("$sum = func.addi(2, 3)\n$div = func.divi(4, 0)");
    assert!(matches!(interp.get_var("$sum").unwrap().value(), DataValue::Int(5)));
    assert!(matches!(interp.get_var("$div").unwrap().value(), DataValue::Error(_)));
    assert_eq!(interp.errno(), 14);
}

#[test]
fn user_function_call() {
    let (interp, _) = run("fp.f = ($a, $b) -> { return func.addi($a, $b) }\n$r = fp.f(2, 3)");
    assert!(matches!(interp.get_var("$r").unwrap().value(), DataValue::Int(5)));
}

#[test]
fn pointers_alias_but_copies_do_not() {
    let (interp, _) = run("$x = 1\n$copy = $x\n$p = $[x]\n$[p] = 2");
    assert_eq!(var(&interp, "$x"), "2");
    assert_eq!(var(&interp, "$copy"), "1");
    assert_eq!(var(&interp, "$p"), "VP -> $x");
}

#[test]
fn reserved_variables_cannot_be_assigned() {
    let (interp, _) = run("$LANG_PATH = /elsewhere");
    assert_eq!(interp.errno(), InterpretingError::FinalVarChange.code());
    assert_eq!(var(&interp, "$LANG_PATH"), ".");

    let (interp, _) = run("$LANG_SOMETHING = 1");
    assert_eq!(interp.errno(), 1);
    assert!(interp.get_var("$LANG_SOMETHING").is_none());
}

#[test]
fn recursion_hits_configured_limit() {
    let (mut interp, _) = Interpreter::with_config_captured(LangConfig::default().with_max_call_depth(32));
    interp.run_str("fp.down = () -> { return fp.down() }\n$r = fp.down()");
    assert_eq!(interp.errno(), InterpretingError::StackOverflow.code());
}

#[test]
fn recursive_function_with_base_case() {
    let (interp, out) = run(concat!(
        "fp.fact = ($n) -> {\n",
        "    con.if($n <= 1)\n",
        "        return 1\n",
        "    con.endif\n",
        "    return func.muli($n, fp.fact(func.subi($n, 1)))\n",
        "}\n",
        "func.println(fp.fact(5))",
    ));
    assert_eq!(out, "120\n");
    assert_eq!(interp.errno(), 0);
}

#[test]
fn top_level_return_value() {
    let mut interp = Interpreter::new();
    let value = interp.run_str("$a = 3\nreturn $a\nfunc.println(unreachable)");
    assert_eq!(value.map(|v| v.to_text()), Some("3".to_string()));
}

#[test]
fn escapes_and_comments() {
    let (_, out) = run("func.print(a\\nb\\tc) # trailing comment\nfunc.print(\\$notvar\\e)");
    assert_eq!(out, "a\nb\tc$notvar");
}

#[test]
fn conditions_are_eager() {
    let (_, out) = run(concat!(
        "fp.side = () -> {\nfunc.print(x)\nreturn 1\n}\n",
        "con.if(0 && fp.side())\n",
        "func.print(taken)\n",
        "con.endif",
    ));
    assert_eq!(out, "x");
}

#[test]
fn parse_errors_surface_as_errno() {
    let (interp, _) = run("con.if($a\nfunc.println(x)\ncon.endif");
    assert_eq!(interp.errno(), InterpretingError::BracketMismatch.code());
}

#[test]
fn external_functions() {
    let (mut interp, output) = Interpreter::with_captured_output();
    interp.register_external("twice", |_interp, args, _scope| {
        let text: String = args.iter().map(DataObject::to_text).collect();
        Some(DataObject::text(format!("{0}{0}", text)))
    });
    interp.run_str("func.println(fp.twice(ab))");
    assert_eq!(output.lock().unwrap().as_str(), "abab\n");
}

#[test]
fn interrupt_flag_stops_loops() {
    let (mut interp, _) = Interpreter::with_captured_output();
    let handle = interp.interrupt_handle();
    interp.register_external("stop", move |_interp, _args, _scope| {
        handle.store(true, Ordering::Relaxed);
        None
    });
    interp.run_str("$n = 0\nfp.tick = ($i) -> {\nfp.stop()\n}\nfunc.repeat(fp.tick, 1000)\n$after = 1");
    assert!(interp.is_interrupted());
    assert!(interp.get_var("$after").is_none());
}

#[test]
fn translations_collect_in_global_table() {
    let (interp, _) = run("lang.name = Demo\n$who = world\ngreeting.$who = Hello $who!");
    assert_eq!(interp.get_translation("lang.name"), Some("Demo"));
    assert_eq!(interp.get_translation("greeting.world"), Some("Hello world!"));
}

#[test]
fn pointer_syntax_on_plain_variable_writes_it() {
    let (interp, _) = run("$x = 1\n$[x] = 5");
    assert_eq!(interp.errno(), 0);
    assert_eq!(var(&interp, "$x"), "5");

    let (interp, _) = run("$[missing] = 5");
    assert_eq!(interp.errno(), InterpretingError::InvalidPtr.code());
}

#[test]
fn interrupted_assignment_keeps_old_value() {
    let (mut interp, _) = Interpreter::with_captured_output();
    let handle = interp.interrupt_handle();
    interp.register_external("halt", move |_interp, _args, _scope| {
        handle.store(true, Ordering::Relaxed);
        Some(DataObject::int(99))
    });
    interp.run_str("$x = 1\n$x = fp.halt()");
    assert!(interp.is_interrupted());
    assert_eq!(var(&interp, "$x"), "1");
}

#[test]
fn nested_blocks_run_in_place() {
    let (interp, out) = run("$a = 1\n{\n$a = 2\n{\nfunc.println(inner $a)\n}\n}\nfunc.println($a)");
    assert_eq!(out, "inner 2\n2\n");
    assert_eq!(interp.errno(), 0);

    let (interp, _) = run("fp.f = () -> {\n{\nreturn in\n}\nreturn out\n}\n$r = fp.f()");
    assert_eq!(var(&interp, "$r"), "in");

    let (interp, _) = run("{\n$a = 1");
    assert_eq!(interp.errno(), InterpretingError::Eof.code());
    assert_eq!(var(&interp, "$a"), "1");
}
