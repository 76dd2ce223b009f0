//! Host instruction listings.
//!
//! The host's lifecycle methods are opaque compiled bodies. We see them as a
//! flat list of instructions, which is all the adapter needs to locate a
//! splice site: the opcode and, for calls and field loads, the member name.

use serde::{Deserialize, Serialize};

/// Instruction opcode. Only the shapes the adapter has to tell apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCode {
    Nop,
    LdArg,
    LdLoc,
    StLoc,
    LdConst,
    LdField,
    Call,
    CallVirt,
    Branch,
    BranchTrue,
    BranchFalse,
    Pop,
    Ret,
}

/// Instruction operand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    None,
    Int(i64),
    /// Called method, as `Type::Method`.
    Method(String),
    Field(String),
    /// Branch target (instruction index).
    Label(usize),
}

/// A single host instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: OpCode,
    pub operand: Operand,
}

impl Instruction {
    #[must_use]
    pub const fn new(op: OpCode, operand: Operand) -> Self {
        Self { op, operand }
    }

    #[must_use]
    pub const fn simple(op: OpCode) -> Self {
        Self::new(op, Operand::None)
    }

    #[must_use]
    pub const fn ld_arg(index: i64) -> Self {
        Self::new(OpCode::LdArg, Operand::Int(index))
    }

    #[must_use]
    pub const fn ld_const(value: i64) -> Self {
        Self::new(OpCode::LdConst, Operand::Int(value))
    }

    pub fn call(method: impl Into<String>) -> Self {
        Self::new(OpCode::Call, Operand::Method(method.into()))
    }

    pub fn call_virt(method: impl Into<String>) -> Self {
        Self::new(OpCode::CallVirt, Operand::Method(method.into()))
    }

    pub fn ld_field(field: impl Into<String>) -> Self {
        Self::new(OpCode::LdField, Operand::Field(field.into()))
    }

    #[must_use]
    pub const fn branch_false(target: usize) -> Self {
        Self::new(OpCode::BranchFalse, Operand::Label(target))
    }

    #[must_use]
    pub const fn ret() -> Self {
        Self::simple(OpCode::Ret)
    }

    /// The called method's name, if this is a call.
    #[must_use]
    pub fn callee(&self) -> Option<&str> {
        match (&self.op, &self.operand) {
            (OpCode::Call | OpCode::CallVirt, Operand::Method(name)) => Some(name),
            _ => None,
        }
    }

    /// Does this instruction call a method whose name ends with `method`?
    ///
    /// Matching on the suffix lets a pattern say `QueueAndRunTrigger`
    /// without caring which host type declares it.
    #[must_use]
    pub fn calls(&self, method: &str) -> bool {
        self.callee().is_some_and(|name| {
            name == method
                || name
                    .strip_suffix(method)
                    .is_some_and(|prefix| prefix.ends_with("::"))
        })
    }
}

/// The instruction listing of one host method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBody {
    /// Fully qualified method name, e.g. `CharacterState::AddStatusEffect`.
    pub name: String,
    pub instructions: Vec<Instruction>,
}

impl MethodBody {
    pub fn new(name: impl Into<String>, instructions: Vec<Instruction>) -> Self {
        Self {
            name: name.into(),
            instructions,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
