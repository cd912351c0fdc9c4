//! Native symbol table.
//!
//! Maps qualified names (`"pkg.Name"`) to host functions. The front end
//! binds an identifier to a native by emitting `Payload::Native(name)`;
//! [`Program::load`](crate::Program::load) resolves every such name here.

use std::fmt::Write as _;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use strider_ir::TypeId;

use crate::{ExecResult, Fault, Machine, NativeFn, NativeFunc, Value};

/// A registered native and its optional type descriptor.
#[derive(Clone, Debug)]
pub struct NativeSymbol {
    pub func: NativeFunc,
    pub ty: Option<TypeId>,
}

/// Qualified name to native function.
#[derive(Clone, Debug, Default)]
pub struct NativeRegistry {
    symbols: FxHashMap<Arc<str>, NativeSymbol>,
}

impl NativeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the small standard set.
    pub fn with_std() -> Self {
        let mut registry = Self::new();
        registry.register("fmt.Println", fmt_println);
        registry.register("fmt.Sprint", fmt_sprint);
        registry.register("strconv.Itoa", strconv_itoa);
        registry.register("strings.ToUpper", strings_to_upper);
        registry
    }

    /// Register `func` under `name`, replacing any previous binding.
    pub fn register(&mut self, name: &str, func: NativeFn) {
        self.register_typed(name, func, None);
    }

    pub fn register_typed(&mut self, name: &str, func: NativeFn, ty: Option<TypeId>) {
        let name: Arc<str> = Arc::from(name);
        let func = NativeFunc::new(Arc::clone(&name), func);
        self.symbols.insert(name, NativeSymbol { func, ty });
    }

    pub fn lookup(&self, name: &str) -> Option<&NativeFunc> {
        self.symbols.get(name).map(|symbol| &symbol.func)
    }

    pub fn symbol(&self, name: &str) -> Option<&NativeSymbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Operands separated by single spaces.
pub(crate) fn join_spaced(args: &[Value]) -> String {
    let mut line = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let _ = write!(line, "{arg}");
    }
    line
}

fn fmt_println(machine: &Machine, args: &[Value]) -> ExecResult<Vec<Value>> {
    machine.output().write_line(&join_spaced(args));
    Ok(Vec::new())
}

/// Spaces go between operands only when neither side is a string.
fn fmt_sprint(_: &Machine, args: &[Value]) -> ExecResult<Vec<Value>> {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !matches!(arg, Value::Str(_)) && !matches!(args[i - 1], Value::Str(_)) {
            out.push(' ');
        }
        let _ = write!(out, "{arg}");
    }
    Ok(vec![Value::string(out)])
}

fn strconv_itoa(_: &Machine, args: &[Value]) -> ExecResult<Vec<Value>> {
    match args {
        [Value::Int(n)] => Ok(vec![Value::string(n.to_string())]),
        _ => Err(bad_args("strconv.Itoa", "expects one int")),
    }
}

fn strings_to_upper(_: &Machine, args: &[Value]) -> ExecResult<Vec<Value>> {
    match args {
        [Value::Str(s)] => Ok(vec![Value::string(s.to_uppercase())]),
        _ => Err(bad_args("strings.ToUpper", "expects one string")),
    }
}

fn bad_args(name: &str, message: &str) -> Fault {
    Fault::Native {
        name: name.to_string(),
        message: message.to_string(),
    }
}
