use crate::context::{Binding, Context};
use crate::errors::Error;
use crate::eval::{evaluate, normalize_bounded, EvalMode};
use crate::grammar;
use crate::resolve::resolve_command;
use crate::syntax::{render, render_type, Command, RenderMode, Term};
use crate::typecheck::type_of;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub mode: EvalMode,
    pub render: RenderMode,
    /// step budget for small-step evaluation, unbounded when `None`
    pub max_steps: Option<usize>,
    /// report a failing command and carry on with the next one instead of
    /// stopping the script
    pub keep_going: bool,
    /// print `value : Type` instead of just the value
    pub print_types: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mode: EvalMode::SmallStep,
            render: RenderMode::Named,
            max_steps: None,
            keep_going: false,
            print_types: false,
        }
    }
}

/// Runs commands one after the other, threading the context so that each
/// binding is visible to every later command
pub struct Program {
    ctx: Context,
    config: Config,
}

impl Default for Program {
    fn default() -> Program {
        Program::new()
    }
}

impl Program {
    pub fn new() -> Program {
        Program::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Program {
        Program {
            ctx: Context::empty(),
            config,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reset(&mut self) {
        self.ctx = Context::empty();
    }

    pub fn set_mode(&mut self, mode: EvalMode) {
        self.config.mode = mode;
    }

    pub fn parse(code: &str) -> Result<Vec<Command>, Error> {
        grammar::ToplevelParser::new()
            .parse(code)
            .map_err(|err| Error::Parse(err.to_string()))
    }

    /// Run every command in `code` against the current context, handing each
    /// printed value or error to `emit`. Returns false if anything failed.
    pub fn run<F>(&mut self, code: &str, mut emit: F) -> bool
    where
        F: FnMut(Result<String, Error>),
    {
        let commands = match Program::parse(code) {
            Ok(commands) => commands,
            Err(err) => {
                emit(Err(err));
                return false;
            }
        };
        let mut ok = true;
        for cmd in commands {
            match self.eval_cmd(&cmd) {
                Ok(Some(line)) => emit(Ok(line)),
                Ok(None) => (),
                Err(err) => {
                    ok = false;
                    emit(Err(err));
                    if !self.config.keep_going {
                        break;
                    }
                }
            }
        }
        ok
    }

    /// Run a whole program from an empty context, one output line per
    /// evaluated term or error
    pub fn eval(&mut self, code: &str) -> String {
        self.reset();
        let mut result = String::new();
        self.run(code, |line| {
            match line {
                Ok(line) => result.push_str(&line),
                Err(err) => result.push_str(&format!("error: {}", err)),
            }
            result.push('\n');
        });
        result
    }

    /// Run a single command, keeping whatever it binds
    pub fn eval_line(&mut self, line: &str) -> String {
        grammar::CommandParser::new()
            .parse(line)
            .map_err(|err| Error::Parse(err.to_string()))
            .and_then(|cmd| self.eval_cmd(&cmd))
            .map(Option::unwrap_or_default)
            .unwrap_or_else(|err| format!("error: {}", err))
    }

    pub fn eval_cmd(&mut self, cmd: &Command) -> Result<Option<String>, Error> {
        let (ctx, cmd) = resolve_command(cmd, &self.ctx)?;
        match cmd {
            Command::Eval(term) => {
                let ty = type_of(&term, &self.ctx)?;
                let value = self.evaluate(&term);
                let mut line = render(&value, &self.ctx, self.config.render);
                if self.config.print_types {
                    line.push_str(" : ");
                    line.push_str(&render_type(&ty, &self.ctx, self.config.render));
                }
                Ok(Some(line))
            }
            Command::Bind(name, Binding::TmAbbrev(term, _)) => {
                let ty = type_of(&term, &self.ctx)?;
                let value = self.evaluate(&term);
                self.ctx = self
                    .ctx
                    .add_binding(name, Binding::TmAbbrev(value, Some(ty)));
                Ok(None)
            }
            Command::Bind(_, _) => {
                self.ctx = ctx;
                Ok(None)
            }
        }
    }

    fn evaluate(&self, term: &Term) -> Term {
        match (self.config.mode, self.config.max_steps) {
            (EvalMode::SmallStep, Some(max_steps)) => {
                normalize_bounded(term, &self.ctx, max_steps)
            }
            (mode, _) => evaluate(term, &self.ctx, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::numeral;

    fn eval_with(config: Config, code: &str) -> String {
        Program::with_config(config).eval(code)
    }

    #[test]
    fn update_context() {
        let mut prog = Program::new();
        assert_eq!(prog.eval("x = 1; succ x;"), "succ (succ 0)\n");
        assert_eq!(prog.eval("iszero 0; iszero 1;"), "true\nfalse\n");
        // eval starts from scratch
        assert_eq!(prog.eval("x;"), "error: name error: variable x not found\n");
    }

    #[test]
    fn recursive_abbreviation() {
        let code = "
            plus = fix (lambda p:Nat->Nat->Nat. lambda m:Nat. lambda n:Nat.
                if iszero m then n else succ (p (pred m) n));
            plus 2 1;
        ";
        let expected = "succ (succ (succ 0))\n";
        assert_eq!(Program::new().eval(code), expected);
        let big = Config {
            mode: EvalMode::BigStep,
            ..Config::default()
        };
        assert_eq!(eval_with(big, code), expected);
    }

    #[test]
    fn type_abbreviations() {
        let code = "N = Nat; f : N -> N; lambda x:N. f x;";
        assert_eq!(Program::new().eval(code), "(λx:N. (f x))\n");
        let typed = Config {
            print_types: true,
            ..Config::default()
        };
        assert_eq!(eval_with(typed.clone(), code), "(λx:N. (f x)) : N->N\n");
        assert_eq!(eval_with(typed, "1;"), "succ 0 : Nat\n");
    }

    #[test]
    fn variants_through_abbreviations() {
        let code = "
            Opt = <none:Unit, some:Nat>;
            get = lambda o:Opt. case o of <none=u> ==> 0 | <some=n> ==> n;
            get (<some=3> as Opt);
            get (<none=unit> as Opt);
        ";
        assert_eq!(Program::new().eval(code), "succ (succ (succ 0))\n0\n");
    }

    #[test]
    fn comments_are_skipped() {
        let code = "// leading comment\n/* block\n comment */ iszero /* inline */ 0;";
        assert_eq!(Program::new().eval(code), "true\n");
    }

    #[test]
    fn errors_stop_the_script() {
        let code = "iszero true; 0;";
        assert_eq!(
            Program::new().eval(code),
            "error: type error: expected type Nat but got Bool instead\n"
        );
        let lenient = Config {
            keep_going: true,
            ..Config::default()
        };
        assert_eq!(
            eval_with(lenient, code),
            "error: type error: expected type Nat but got Bool instead\n0\n"
        );
        assert_eq!(
            Program::new().eval("lambda x:Foo. x;"),
            "error: name error: type Foo not found\n"
        );
        assert!(Program::new().eval("lambda;").starts_with("error: parse error:"));
    }

    #[test]
    fn run_reports_failure() {
        let mut prog = Program::new();
        let mut lines = Vec::new();
        assert!(prog.run("0; x = true;", |line| lines.push(line)));
        assert_eq!(lines, vec![Ok("0".to_string())]);
        lines.clear();
        assert!(!prog.run("if x then 0 else y;", |line| lines.push(line)));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_err());
    }

    #[test]
    fn rendering_options() {
        let indexed = Config {
            render: RenderMode::DeBruijn,
            ..Config::default()
        };
        assert_eq!(eval_with(indexed, "lambda x:Nat. x;"), "(λ:Nat. 0)\n");
        assert_eq!(
            Program::new().eval("x : Nat; lambda x:Nat. x;"),
            "(λx':Nat. x')\n"
        );
    }

    #[test]
    fn bounded_evaluation() {
        let bounded = Config {
            max_steps: Some(1),
            ..Config::default()
        };
        assert_eq!(
            eval_with(bounded, "fix (lambda x:Nat. succ x);"),
            "succ (fix (λx:Nat. succ x))\n"
        );
    }

    #[test]
    fn large_numerals() {
        let expected = format!("{}\n", numeral(20000));
        for mode in &[EvalMode::SmallStep, EvalMode::BigStep] {
            let config = Config {
                mode: *mode,
                ..Config::default()
            };
            assert_eq!(eval_with(config.clone(), "20000;"), expected);
            assert_eq!(
                eval_with(config.clone(), "x = 20000; iszero x; iszero (pred x);"),
                "false\nfalse\n"
            );
            let typed = Config {
                print_types: true,
                ..config
            };
            assert_eq!(
                eval_with(typed, "succ 20000;"),
                format!("{} : Nat\n", numeral(20001))
            );
        }
    }

    #[test]
    fn lines_share_context() {
        let mut prog = Program::new();
        assert_eq!(prog.eval_line("x = 2"), "");
        assert_eq!(prog.eval_line("pred x"), "succ 0");
        assert_eq!(prog.eval_line("X"), "");
        assert_eq!(prog.context().len(), 2);
        assert_eq!(
            prog.eval_line("y"),
            "error: name error: variable y not found"
        );
        prog.reset();
        assert!(prog.context().is_empty());
    }
}
