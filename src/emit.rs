//! C code emission
//!
//! Renders a subprogram table as C source text: one `Instruction` array
//! per subprogram, preceded by the VM runtime (embedded from
//! `src/runtime.c`) and followed by a `main` that wires the builtins and
//! starts the process at `__main__`. Pure formatting; every semantic
//! decision was made by the earlier stages.
//!
//! The table's insertion order already places every lambda before the
//! subprogram that closes over it, so the arrays can reference each other
//! without forward declarations. Subprogram names pass through verbatim;
//! `$` in identifiers is accepted by the compilers the runtime targets.

use std::fmt::Write;

use crate::transform::{Instruction, Literal, SubprogramTable, ENTRY_SUBPROGRAM};

const RUNTIME: &str = include_str!("runtime.c");

pub fn emit_c(table: &SubprogramTable) -> String {
    let mut output = String::from(RUNTIME);

    for (name, body) in table.iter() {
        output.push('\n');
        emit_subprogram(&mut output, name, body);
    }

    output.push_str(EPILOGUE);
    output
}

fn emit_subprogram(output: &mut String, name: &str, body: &[Instruction]) {
    let _ = writeln!(output, "Instruction {}[] =", name);
    output.push_str("{\n");
    for instruction in body {
        let _ = writeln!(output, "  {},", render_instruction(instruction));
    }
    // The entry sequence halts the process; every other subprogram returns
    // to its caller.
    if name == ENTRY_SUBPROGRAM {
        output.push_str("  (Instruction){ HALT, (Object){ NIL, (Instance)(int32_t)0 } }\n");
    } else {
        output.push_str("  (Instruction){ RETURN, (Object){ NIL, (Instance)(int32_t)0 } }\n");
    }
    output.push_str("};\n");
}

fn render_instruction(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Call => {
            "(Instruction){ CALL, (Object){ NIL, (Instance)(int32_t)0 } }".to_string()
        }
        Instruction::Drop => {
            "(Instruction){ DROP, (Object){ NIL, (Instance)(int32_t)0 } }".to_string()
        }
        Instruction::Close { subprogram } => format!(
            "(Instruction){{ CLOSE, (Object){{ CLOSURE, (Instance)(Closure){{ NULL, {} }} }} }}",
            subprogram
        ),
        Instruction::Push { value } => match value {
            Literal::Integer(value) => format!(
                "(Instruction){{ PUSH, (Object){{ INTEGER, (Instance)(int32_t){} }} }}",
                value
            ),
        },
        Instruction::PushValue { symbol } => format!(
            "(Instruction){{ PUSH_VALUE, (Object){{ STRING, (Instance)(char*)\"{}\" }} }}",
            symbol
        ),
        Instruction::PopValue { symbol } => format!(
            "(Instruction){{ POP_VALUE, (Object){{ STRING, (Instance)(char*)\"{}\" }} }}",
            symbol
        ),
    }
}

const EPILOGUE: &str = r#"
Instruction __print__[] =
{
  (Instruction){ PRINT, (Object){ NIL, (Instance)(int32_t)0 } },
  (Instruction){ PUSH, (Object){ NIL, (Instance)(int32_t)0 } },
  (Instruction){ RETURN, (Object){ NIL, (Instance)(int32_t)0 } }
};

Instruction __pow__[] =
{
  (Instruction){ POW, (Object){ NIL, (Instance)(int32_t)0 } },
  (Instruction){ RETURN, (Object){ NIL, (Instance)(int32_t)0 } }
};

int main(int argc, char** argv)
{
  Process* process = Process_construct(__main__);

  Environment_set(
    process->environment,
    (Object){ STRING, (Instance)(char*)"print" },
    (Object){ CLOSURE, (Instance)(Closure){ NULL, __print__ } }
  );
  Environment_set(
    process->environment,
    (Object){ STRING, (Instance)(char*)"pow" },
    (Object){ CLOSURE, (Instance)(Closure){ NULL, __pow__ } }
  );

  execute(process);

  Process_destruct(process);
  return EXIT_SUCCESS;
}
"#;
