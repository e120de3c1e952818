use crate::ast::{Expr, FunctionDecl, Stmt};
use crate::environment::{Environment, SharedEnvironment};
use crate::errors::RuntimeError;
use crate::function::{Function, NATIVES};
use crate::stack::ensure_sufficient_stack;
use crate::tokens::{Kind, Token};
use crate::value::Value;

use std::io::Write;
use std::rc::Rc;

use tracing::{debug, trace};

/// Calls allowed to be active at once before the program is stopped with `Stack overflow.`.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

type RuntimeExprResult = Result<Value, RuntimeError>;
type RuntimeStmtResult = Result<Flow, RuntimeError>;

/// How a statement finished. A `Return` is carried up through every enclosing block and loop
/// until the function call that is running them.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter<'a, W: Write> {
    out: &'a mut W,
    globals: SharedEnvironment,
    depth: usize,
    max_depth: usize,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        let mut globals = Environment::new();

        for native in NATIVES {
            globals.define(native.name, Value::Function(Rc::new(Function::Native(*native))));
        }

        Self {
            out,
            globals: globals.into_shared(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run a program against the global scope. Stops at the first runtime error.
    /// Globals are kept between calls.
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        let globals = Rc::clone(&self.globals);

        if let Err(e) = self.execute_block(stmts, &globals) {
            debug!(line = e.line(), error = %e, "runtime error");
            return Err(e);
        }

        Ok(())
    }

    /// Evaluate a lone expression against the global scope.
    pub fn evaluate(&mut self, expr: &Expr) -> RuntimeExprResult {
        let globals = Rc::clone(&self.globals);
        self.evaluate_expression(expr, &globals)
    }
}

// Statement execution.
impl<W: Write> Interpreter<'_, W> {
    fn execute(&mut self, stmt: &Stmt, env: &SharedEnvironment) -> RuntimeStmtResult {
        ensure_sufficient_stack(|| -> RuntimeStmtResult {
            match stmt {
                Stmt::Expr(expr) => {
                    self.evaluate_expression(expr, env)?;
                    Ok(Flow::Normal)
                }

                Stmt::Print(expr) => {
                    let value = self.evaluate_expression(expr, env)?;
                    writeln!(self.out, "{}", value).map_err(|e| RuntimeError::Output {
                        message: e.to_string(),
                        line: expr.line(),
                    })?;
                    Ok(Flow::Normal)
                }

                Stmt::Variable { name, initial } => {
                    self.visit_variable_stmt(name, initial.as_ref(), env)
                }

                Stmt::Block(stmts) => {
                    let scope = Environment::with_enclosing(env).into_shared();
                    self.execute_block(stmts, &scope)
                }

                Stmt::If {
                    condition,
                    if_branch,
                    else_branch,
                } => {
                    if self.evaluate_expression(condition, env)?.is_truthy() {
                        self.execute(if_branch, env)
                    } else if let Some(else_branch) = else_branch {
                        self.execute(else_branch, env)
                    } else {
                        Ok(Flow::Normal)
                    }
                }

                Stmt::While { condition, body } => self.visit_while_stmt(condition, body, env),

                Stmt::Function(decl) => {
                    let function = Function::declared(Rc::clone(decl), env);

                    env.borrow_mut()
                        .define(decl.name.name(), Value::Function(Rc::new(function)));
                    Ok(Flow::Normal)
                }

                Stmt::Return { value, .. } => {
                    let value = match value {
                        Some(expr) => self.evaluate_expression(expr, env)?,
                        None => Value::Nil,
                    };

                    Ok(Flow::Return(value))
                }

                Stmt::Class { name, .. } => Err(RuntimeError::Unsupported {
                    feature: "Classes are",
                    line: name.line,
                }),
            }
        })
    }

    /// Execute statements in order in `env`, stopping early on a return.
    fn execute_block(&mut self, stmts: &[Stmt], env: &SharedEnvironment) -> RuntimeStmtResult {
        for stmt in stmts {
            if let Flow::Return(value) = self.execute(stmt, env)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    fn visit_variable_stmt(
        &mut self,
        name: &Token,
        initial: Option<&Expr>,
        env: &SharedEnvironment,
    ) -> RuntimeStmtResult {
        let value = match initial {
            Some(expr) => self.evaluate_expression(expr, env)?,
            None => Value::Nil,
        };

        env.borrow_mut().define(name.name(), value);
        Ok(Flow::Normal)
    }

    fn visit_while_stmt(
        &mut self,
        condition: &Expr,
        body: &Stmt,
        env: &SharedEnvironment,
    ) -> RuntimeStmtResult {
        while self.evaluate_expression(condition, env)?.is_truthy() {
            if let Flow::Return(value) = self.execute(body, env)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }
}

// Expression evaluation.
impl<W: Write> Interpreter<'_, W> {
    fn evaluate_expression(&mut self, expr: &Expr, env: &SharedEnvironment) -> RuntimeExprResult {
        ensure_sufficient_stack(|| -> RuntimeExprResult {
            match expr {
                Expr::Literal { value, .. } => Ok(value.clone()),
                Expr::Group(expr) => self.evaluate_expression(expr, env),
                Expr::Unary { op, expr } => self.visit_unary_expr(op, expr, env),
                Expr::Binary { left, op, right } => self.visit_binary_expr(left, op, right, env),
                Expr::Logical { left, op, right } => self.visit_logical_expr(left, op, right, env),

                Expr::Variable(ident) => env.borrow().get(ident),
                Expr::Assign { name, value } => {
                    let value = self.evaluate_expression(value, env)?;
                    env.borrow_mut().assign(name, value.clone())?;
                    Ok(value)
                }

                Expr::Call {
                    callee,
                    paren,
                    args,
                } => self.visit_call_expr(callee, paren, args, env),

                Expr::Get { name, .. } | Expr::Set { name, .. } => Err(RuntimeError::Unsupported {
                    feature: "Properties are",
                    line: name.line,
                }),
                Expr::This(keyword) => Err(RuntimeError::Unsupported {
                    feature: "'this' is",
                    line: keyword.line,
                }),
                Expr::Super { keyword, .. } => Err(RuntimeError::Unsupported {
                    feature: "'super' is",
                    line: keyword.line,
                }),
            }
        })
    }

    fn visit_unary_expr(
        &mut self,
        op: &Token,
        expr: &Expr,
        env: &SharedEnvironment,
    ) -> RuntimeExprResult {
        let val = self.evaluate_expression(expr, env)?;

        match op.kind {
            Kind::Minus => match val {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::NumberOperand { line: op.line }),
            },

            Kind::Bang => Ok(Value::Boolean(!val.is_truthy())),
            _ => unreachable!("invalid unary operator '{}'", op.lexeme),
        }
    }

    fn visit_binary_expr(
        &mut self,
        left: &Expr,
        op: &Token,
        right: &Expr,
        env: &SharedEnvironment,
    ) -> RuntimeExprResult {
        let left = self.evaluate_expression(left, env)?;
        let right = self.evaluate_expression(right, env)?;

        let line = op.line;

        // Everything other than `+` and equality only works on numbers.
        let numbers = || match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
            _ => Err(RuntimeError::NumberOperands { line }),
        };

        match op.kind {
            // Plus operator works on two numbers or two strings.
            Kind::Plus => match (&left, &right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(format!("{}{}", l, r))),
                _ => Err(RuntimeError::AddOperands { line }),
            },

            Kind::Minus => numbers().map(|(l, r)| Value::Number(l - r)),
            Kind::Star => numbers().map(|(l, r)| Value::Number(l * r)),

            // Checks for 0 division.
            Kind::Slash => match numbers()? {
                (_, r) if r == 0.0 => Err(RuntimeError::ZeroDivision { line }),
                (l, r) => Ok(Value::Number(l / r)),
            },

            Kind::Less => numbers().map(|(l, r)| Value::Boolean(l < r)),
            Kind::LessEq => numbers().map(|(l, r)| Value::Boolean(l <= r)),
            Kind::Greater => numbers().map(|(l, r)| Value::Boolean(l > r)),
            Kind::GreaterEq => numbers().map(|(l, r)| Value::Boolean(l >= r)),

            Kind::DoubleEq => Ok(Value::Boolean(left == right)),
            Kind::BangEq => Ok(Value::Boolean(left != right)),

            _ => unreachable!("invalid binary operator '{}'", op.lexeme),
        }
    }

    /// Yields whichever operand decided the result, not a coerced boolean.
    fn visit_logical_expr(
        &mut self,
        left: &Expr,
        op: &Token,
        right: &Expr,
        env: &SharedEnvironment,
    ) -> RuntimeExprResult {
        let left = self.evaluate_expression(left, env)?;

        match op.kind {
            Kind::Or if left.is_truthy() => Ok(left),
            Kind::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate_expression(right, env),
        }
    }

    fn visit_call_expr(
        &mut self,
        callee: &Expr,
        paren: &Token,
        args: &[Expr],
        env: &SharedEnvironment,
    ) -> RuntimeExprResult {
        // Nothing in the argument list runs unless the callee can be called.
        let function = match self.evaluate_expression(callee, env)? {
            Value::Function(function) => function,
            _ => return Err(RuntimeError::NotCallable { line: paren.line }),
        };

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expression(arg, env)?);
        }

        if values.len() != function.arity() {
            return Err(RuntimeError::ArityMismatch {
                expected: function.arity(),
                received: values.len(),
                line: paren.line,
            });
        }

        trace!(name = function.name(), depth = self.depth, "call");

        match function.as_ref() {
            Function::Native(native) => {
                (native.call_impl)(&values, env).map_err(|message| RuntimeError::Native {
                    message,
                    line: paren.line,
                })
            }

            Function::User { decl, closure } => match closure.scope() {
                Some(closure) => self.call_function(decl, &closure, values, paren.line),
                // Reads always hand out shared handles, so only a freed scope lands here.
                None => Err(RuntimeError::NotCallable { line: paren.line }),
            },
        }
    }

    /// Run a user function body in a fresh scope whose parent is the function's closure.
    /// Parameters and top level body declarations share that one scope.
    fn call_function(
        &mut self,
        decl: &FunctionDecl,
        closure: &SharedEnvironment,
        args: Vec<Value>,
        line: usize,
    ) -> RuntimeExprResult {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::StackOverflow { line });
        }

        let mut scope = Environment::with_enclosing(closure);
        for (param, arg) in decl.params.iter().zip(args) {
            scope.define(param.name(), arg);
        }
        let scope = scope.into_shared();

        self.depth += 1;
        let result = self.execute_block(&decl.body, &scope);
        self.depth -= 1;

        match result? {
            Flow::Return(value) => {
                trace!(name = decl.name.name(), value = %value, "return");
                Ok(value)
            }
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_input;

    use pretty_assertions::assert_eq;

    fn run(input: &str, max_depth: usize) -> (String, Result<(), RuntimeError>) {
        let mut buf = Vec::new();

        let (stmts, errors) = parse_input(input);
        assert!(errors.is_empty(), "{:?}", errors);

        let result = Interpreter::new(&mut buf)
            .with_max_depth(max_depth)
            .interpret(&stmts);

        (String::from_utf8(buf).unwrap(), result)
    }

    fn interpret_and_capture(input: &str) -> String {
        let (output, result) = run(input, DEFAULT_MAX_DEPTH);
        assert_eq!(result, Ok(()));
        output
    }

    fn interpret_and_fail(input: &str) -> (String, RuntimeError) {
        let (output, result) = run(input, DEFAULT_MAX_DEPTH);
        (output, result.unwrap_err())
    }

    #[test]
    fn test_basic_arithmetic() {
        let input = "print 5 + 5;";
        let output = interpret_and_capture(input);
        assert_eq!("10", output.trim());

        let input = "print 10 - 5 * 2;";
        let output = interpret_and_capture(input);
        assert_eq!("0", output.trim());

        let input = "print 3 * ((10 - 6) * (4 + 4)) / 2;";
        let output = interpret_and_capture(input);
        assert_eq!("48", output.trim());

        let input = "print 7 / 2;";
        let output = interpret_and_capture(input);
        assert_eq!("3.5", output.trim());
    }

    #[test]
    fn test_precedence_and_associativity() {
        let input = "print 1 + 2 * 3;";
        assert_eq!("7", interpret_and_capture(input).trim());

        let input = "print \"a\" + \"b\" + \"c\";";
        assert_eq!("abc", interpret_and_capture(input).trim());

        let input = "print 10 - 3 - 2;";
        assert_eq!("5", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_comparison_operators() {
        let cases = [
            ("print 5 < 10;", "true"),
            ("print 5 <= 10;", "true"),
            ("print 5 > 10;", "false"),
            ("print 5 >= 10;", "false"),
            ("print 5 == 10;", "false"),
            ("print 5 != 10;", "true"),
            ("print nil == nil;", "true"),
            ("print \"1\" == 1;", "false"),
            ("print 0 == false;", "false"),
            ("print \"ab\" == \"a\" + \"b\";", "true"),
        ];

        for (input, expected) in cases {
            assert_eq!(expected, interpret_and_capture(input).trim(), "{}", input);
        }
    }

    #[test]
    fn test_variable_declaration_and_usage() {
        let input = "\
            var x = \"Hello, World!\";
            print x;";

        let output = interpret_and_capture(input);
        assert_eq!("Hello, World!", output.trim());

        let input = "\
            var x = 5;
            var y = x * 2;
            var z = y * 2 + 5;
            print x;
            print y;
            print z;";

        let output = interpret_and_capture(input);
        assert_eq!("5\n10\n25", output.trim());

        let input = "\
            var x = 5;
            var x = 10;
            print x;";

        let output = interpret_and_capture(input);
        assert_eq!("10", output.trim());

        let input = "var x; print x;";
        assert_eq!("nil", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_variable_assignment() {
        let input = "\
            var x = 1;\
            x = 2;\
            print x;";

        let output = interpret_and_capture(input);
        assert_eq!("2", output.trim());

        let input = "var a; var b; a = b = 3; print a + b;";
        assert_eq!("6", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_assignment_does_not_declare() {
        let (output, error) = interpret_and_fail("print 1;\nx = 2;\nprint 3;");

        assert_eq!("1\n", output);
        assert_eq!(
            error,
            RuntimeError::UndefinedVariable {
                name: "x".to_string(),
                line: 2
            }
        );
    }

    #[test]
    fn test_block_scoping() {
        let input = "var x = 1; { var x = 2; print x; } print x;";
        assert_eq!("2\n1", interpret_and_capture(input).trim());

        let input = "var x = 1; { x = 2; } print x;";
        assert_eq!("2", interpret_and_capture(input).trim());

        let (_, error) = interpret_and_fail("{ var y = 1; } print y;");
        assert_eq!(error.to_string(), "Undefined variable 'y'.");
    }

    #[test]
    fn test_truthiness() {
        let cases = [
            ("if (0) print \"yes\"; else print \"no\";", "no"),
            ("if (\"\") print \"yes\"; else print \"no\";", "yes"),
            ("if (nil) print \"yes\"; else print \"no\";", "no"),
            ("if (false) print \"yes\"; else print \"no\";", "no"),
            ("if (-1) print \"yes\"; else print \"no\";", "yes"),
            ("if (clock) print \"yes\"; else print \"no\";", "yes"),
            ("print !0;", "true"),
            ("print !\"\";", "false"),
        ];

        for (input, expected) in cases {
            assert_eq!(expected, interpret_and_capture(input).trim(), "{}", input);
        }
    }

    #[test]
    fn test_logical_operators_yield_operands() {
        let cases = [
            ("print nil or \"default\";", "default"),
            ("print 0 and 1;", "0"),
            ("print 1 and 2;", "2"),
            ("print \"a\" or \"b\";", "a"),
            ("print false or nil;", "nil"),
        ];

        for (input, expected) in cases {
            assert_eq!(expected, interpret_and_capture(input).trim(), "{}", input);
        }

        let input = "var a = 1; false and (a = 2); true or (a = 3); print a;";
        assert_eq!("1", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_while_and_for_loops() {
        let input = "var i = 0; while (i < 3) { print i; i = i + 1; }";
        assert_eq!("0\n1\n2", interpret_and_capture(input).trim());

        let input = "var sum = 0; for (var i = 1; i <= 10; i = i + 1) sum = sum + i; print sum;";
        assert_eq!("55", interpret_and_capture(input).trim());

        let (_, error) = interpret_and_fail("for (var i = 0; i < 1; i = i + 1) {} print i;");
        assert_eq!(error.to_string(), "Undefined variable 'i'.");
    }

    #[test]
    fn test_functions_and_recursion() {
        let input = "\
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(15);";

        assert_eq!("610", interpret_and_capture(input).trim());

        let input = "fun noop() {} print noop();";
        assert_eq!("nil", interpret_and_capture(input).trim());

        let input = "fun add(a, b) { return a + b; } print add; print clock;";
        assert_eq!("<fn add>\n<native fn>", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_closures_keep_independent_state() {
        let input = "\
            fun makeCounter() {
                var count = 0;
                fun counter() {
                    count = count + 1;
                    return count;
                }
                return counter;
            }

            var a = makeCounter();
            var b = makeCounter();
            print a();
            print a();
            print b();
            print a();";

        assert_eq!("1\n2\n1\n3", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_closure_outlives_defining_block() {
        let input = "\
            var f;
            {
                var captured = \"kept\";
                fun show() { print captured; }
                f = show;
            }
            f();";

        assert_eq!("kept", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_return_inside_while_stops_function() {
        let input = "\
            fun find() {
                var i = 0;
                while (true) {
                    if (i == 3) return i;
                    i = i + 1;
                }
                print \"unreachable\";
            }
            print find();";

        assert_eq!("3", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_arity_error_halts_execution() {
        let (output, error) =
            interpret_and_fail("fun f(a, b) {}\nprint 1;\nf(1);\nprint 2;");

        assert_eq!("1\n", output);
        assert_eq!(error.to_string(), "Expected 2 arguments but got 1.");
        assert_eq!(error.line(), 3);
    }

    #[test]
    fn test_callee_checked_before_arguments() {
        let input = "\
            fun f() { print \"side effect\"; return 1; }
            var x = nil;
            x(f());";

        let (output, error) = interpret_and_fail(input);

        assert_eq!("", output);
        assert_eq!(error, RuntimeError::NotCallable { line: 3 });

        // Arguments still run left to right before the arity check.
        let input = "\
            fun one(a) {}
            one(clock(), clock(), missing);";

        let (_, error) = interpret_and_fail(input);
        assert_eq!(error.to_string(), "Undefined variable 'missing'.");
    }

    #[test]
    fn test_function_identity() {
        let input = "\
            fun make() { fun inner() {} return inner; }
            var a = make();
            var b = make();
            var c = a;
            print a == b;
            print a == c;
            print make == make;
            print clock == clock;";

        assert_eq!("false\ntrue\ntrue\ntrue", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_local_recursion_through_declaring_scope() {
        let input = "\
            fun outer(n) {
                fun count(i) {
                    if (i > n) return 0;
                    return i + count(i + 1);
                }
                return count(1);
            }
            print outer(4);
            print outer(10);";

        assert_eq!("10\n55", interpret_and_capture(input).trim());
    }

    #[test]
    fn test_print_write_failure_is_a_runtime_error() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let (stmts, _) = parse_input("var x = 1;\nprint x;\nx = 2;");
        let mut out = Closed;
        let mut interpreter = Interpreter::new(&mut out);

        assert_eq!(
            interpreter.interpret(&stmts),
            Err(RuntimeError::Output {
                message: "pipe closed".to_string(),
                line: 2
            })
        );

        // The failed print stopped the program before the assignment.
        assert_eq!(
            interpreter.evaluate(&Expr::Variable(Token::new(
                Kind::Identifier("x".to_string()),
                "x",
                1
            ))),
            Ok(Value::Number(1.0))
        );
    }

    #[test]
    fn test_type_errors() {
        let cases = [
            ("print \"a\" < 3;", "Operands must be numbers."),
            ("print 1 + \"a\";", "Operands must be two numbers or two strings."),
            ("print \"a\" * 2;", "Operands must be numbers."),
            ("print -\"a\";", "Operand must be a number."),
            ("print 5 / 0;", "Division by zero."),
            ("\"not a function\"();", "Can only call functions and classes."),
            ("print missing;", "Undefined variable 'missing'."),
        ];

        for (input, expected) in cases {
            let (output, error) = interpret_and_fail(input);
            assert_eq!(output, "", "{}", input);
            assert_eq!(error.to_string(), expected, "{}", input);
        }
    }

    #[test]
    fn test_runtime_error_stops_later_statements() {
        let (output, error) = interpret_and_fail("print 1;\nprint 5 / 0;\nprint 2;");

        assert_eq!("1\n", output);
        assert_eq!(error, RuntimeError::ZeroDivision { line: 2 });
    }

    #[test]
    fn test_unbounded_recursion_is_reported() {
        let (_, result) = run("fun r() { r(); }\nr();", 64);
        assert_eq!(result, Err(RuntimeError::StackOverflow { line: 1 }));

        let (_, result) = run("fun r(n) { return r(n + 1); } r(0);", DEFAULT_MAX_DEPTH);
        assert_eq!(result, Err(RuntimeError::StackOverflow { line: 1 }));
    }

    #[test]
    fn test_class_features_are_unsupported() {
        let cases = [
            ("class A {}", "Classes are not supported."),
            ("var a = 1; print a.b;", "Properties are not supported."),
            ("var a = 1; a.b = 2;", "Properties are not supported."),
        ];

        for (input, expected) in cases {
            let (_, error) = interpret_and_fail(input);
            assert_eq!(error.to_string(), expected, "{}", input);
        }
    }

    #[test]
    fn test_globals_persist_between_runs() {
        let mut buf = Vec::new();
        let mut interpreter = Interpreter::new(&mut buf);

        let (stmts, _) = parse_input("var x = 40; fun inc(n) { return n + 1; }");
        interpreter.interpret(&stmts).unwrap();

        let (stmts, _) = parse_input("print x;");
        interpreter.interpret(&stmts).unwrap();

        // A failed run leaves earlier definitions alone.
        let (stmts, _) = parse_input("x = 41; print nope;");
        assert!(interpreter.interpret(&stmts).is_err());

        let (stmts, _) = parse_input("print inc(x);");
        interpreter.interpret(&stmts).unwrap();
        drop(interpreter);

        assert_eq!(String::from_utf8(buf).unwrap(), "40\n42\n");
    }

    #[test]
    fn test_evaluate_expression() {
        let mut buf = Vec::new();
        let mut interpreter = Interpreter::new(&mut buf);

        let (tokens, _) = crate::scanner::scan_tokens("(1 + 2) * 4 == 12 and \"ok\"");
        let (expr, _) = crate::parser::Parser::new(&tokens).parse_expression();

        assert_eq!(
            interpreter.evaluate(&expr.unwrap()),
            Ok(Value::String("ok".to_string()))
        );
    }
}
