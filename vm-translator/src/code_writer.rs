//! Translates VM commands into Hack assembly.

use crate::error::VmError;
use std::io::Write;

macro_rules! write_asm {
    ($writer:expr, $($line:literal)*) => {
        $writer.write_all(concat!($($line, "\n"),*).as_bytes())
    };
}

#[derive(Clone, Copy)]
enum SegmentSymbol {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl SegmentSymbol {
    fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(SegmentSymbol::Local),
            "argument" => Some(SegmentSymbol::Argument),
            "this" => Some(SegmentSymbol::This),
            "that" => Some(SegmentSymbol::That),
            "temp" => Some(SegmentSymbol::Temp),
            "pointer" => Some(SegmentSymbol::Pointer),
            "static" => Some(SegmentSymbol::Static),
            "constant" => Some(SegmentSymbol::Constant),
            _ => None,
        }
    }

    fn base_symbol(&self) -> &'static str {
        match self {
            SegmentSymbol::Local => "LCL",
            SegmentSymbol::Argument => "ARG",
            SegmentSymbol::This => "THIS",
            SegmentSymbol::That => "THAT",
            SegmentSymbol::Temp => "R5",
            SegmentSymbol::Pointer => "THIS",
            SegmentSymbol::Static => "STATIC",
            SegmentSymbol::Constant => "CONSTANT",
        }
    }
}

/// Emits assembly for one VM translation unit (a single input, or the whole
/// of a directory translation sharing one output file).
///
/// Label scoping: branch labels are qualified `function$label` so the same
/// label text in two different functions never collides; before the first
/// `function` declaration in a file they collapse to a bare `label`. Static
/// variables are qualified `sourceFile.index` so two `.vm` files translated
/// into the same output never alias each other's statics.
pub struct CodeWriter<W: Write> {
    out: W,
    comparison_counter: usize,
    call_counter: usize,
    /// Base name (no extension) of the `.vm` file currently being translated.
    current_source: String,
    /// Name of the VM function currently being emitted, for label scoping.
    current_function: String,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W) -> Self {
        CodeWriter {
            out,
            comparison_counter: 0,
            call_counter: 0,
            current_source: String::new(),
            current_function: String::new(),
        }
    }

    /// Called once per input `.vm` file before translating its commands;
    /// determines the qualifier used for that file's static variables.
    ///
    /// Also clears `current_function`: a new source file starts with no
    /// enclosing function, so a bare `label` appearing before that file's
    /// first `function` directive scopes to `file$$label`, not to whatever
    /// function the previous file in a directory translation last declared.
    pub fn set_current_source(&mut self, source_filename: &str) {
        let name = std::path::Path::new(source_filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown");
        self.current_source.clear();
        self.current_source.push_str(name);
        self.current_function.clear();
    }

    /// Emits the bootstrap sequence: `SP=256`, then a `call Sys.init 0`.
    /// Only emitted in directory-translation mode (spec §4.2).
    pub fn write_init(&mut self) -> Result<(), VmError> {
        write_asm!(self.out,
            "// bootstrap"
            "@256"
            "D=A"
            "@SP"
            "M=D"
        )?;
        self.write_call("Sys.init", 0)
    }

    /// `F$f$L`: file stem, enclosing function (empty before the first
    /// `function` directive), and the label text itself.
    fn label_symbol(&self, label: &str) -> String {
        format!("{}${}${}", self.current_source, self.current_function, label)
    }

    pub fn write_arithmetic(&mut self, command: &str) -> Result<(), VmError> {
        writeln!(self.out, "// {command}")?;
        match command {
            "add" => self.write_binary_op("D+M"),
            "sub" => self.write_binary_op("M-D"),
            "and" => self.write_binary_op("D&M"),
            "or" => self.write_binary_op("D|M"),
            "neg" => self.write_unary_op("-M"),
            "not" => self.write_unary_op("!M"),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            other => Err(VmError::UnknownArithmetic(other.to_string())),
        }
    }

    fn write_binary_op(&mut self, operation: &str) -> Result<(), VmError> {
        write_asm!(self.out,
            "@SP"
            "AM=M-1"
            "D=M"
            "A=A-1"
        )?;
        writeln!(self.out, "M={operation}")?;
        Ok(())
    }

    fn write_unary_op(&mut self, operation: &str) -> Result<(), VmError> {
        write_asm!(self.out,
            "@SP"
            "A=M-1"
        )?;
        writeln!(self.out, "M={operation}")?;
        Ok(())
    }

    fn write_comparison(&mut self, jump: &str) -> Result<(), VmError> {
        let n = self.comparison_counter;
        self.comparison_counter += 1;
        write_asm!(self.out,
            "@SP"
            "AM=M-1"
            "D=M"
            "A=A-1"
            "D=M-D"
        )?;
        writeln!(
            self.out,
            "@TRUE{n}\n\
             D;{jump}\n\
             @SP\n\
             A=M-1\n\
             M=0\n\
             @END{n}\n\
             0;JMP\n\
             (TRUE{n})\n\
             @SP\n\
             A=M-1\n\
             M=-1\n\
             (END{n})",
        )?;
        Ok(())
    }

    pub fn write_push_pop(
        &mut self,
        command: &str,
        segment: &str,
        index: i32,
    ) -> Result<(), VmError> {
        writeln!(self.out, "// {command} {segment} {index}")?;
        if command == "push" {
            self.write_push(segment, index)
        } else {
            self.write_pop(segment, index)
        }
    }

    fn write_push(&mut self, segment: &str, index: i32) -> Result<(), VmError> {
        match SegmentSymbol::from_str(segment) {
            Some(SegmentSymbol::Constant) => {
                writeln!(self.out, "@{index}\nD=A")?;
                self.write_push_d()
            }
            Some(seg @ (SegmentSymbol::Local | SegmentSymbol::Argument | SegmentSymbol::This | SegmentSymbol::That)) => {
                writeln!(self.out, "@{}\nD=M\n@{index}\nA=D+A\nD=M", seg.base_symbol())?;
                self.write_push_d()
            }
            Some(SegmentSymbol::Temp) => {
                writeln!(self.out, "@{}\nD=A\n@{index}\nA=D+A\nD=M", SegmentSymbol::Temp.base_symbol())?;
                self.write_push_d()
            }
            Some(SegmentSymbol::Pointer) => {
                writeln!(self.out, "@THIS\nD=A\n@{index}\nA=D+A\nD=M")?;
                self.write_push_d()
            }
            Some(SegmentSymbol::Static) => {
                writeln!(self.out, "@{}.{index}\nD=M", self.current_source)?;
                self.write_push_d()
            }
            None => Err(VmError::UnknownSegment(segment.to_string())),
        }
    }

    fn write_pop(&mut self, segment: &str, index: i32) -> Result<(), VmError> {
        match SegmentSymbol::from_str(segment) {
            Some(seg @ (SegmentSymbol::Local | SegmentSymbol::Argument | SegmentSymbol::This | SegmentSymbol::That)) => {
                writeln!(self.out, "@{}\nD=M\n@{index}\nD=D+A\n@R13\nM=D", seg.base_symbol())?;
                self.write_pop_to_d()?;
                write_asm!(self.out, "@R13" "A=M" "M=D")?;
            }
            Some(SegmentSymbol::Temp) => {
                writeln!(self.out, "@{}\nD=A\n@{index}\nD=D+A\n@R13\nM=D", SegmentSymbol::Temp.base_symbol())?;
                self.write_pop_to_d()?;
                write_asm!(self.out, "@R13" "A=M" "M=D")?;
            }
            Some(SegmentSymbol::Pointer) => {
                writeln!(self.out, "@THIS\nD=A\n@{index}\nD=D+A\n@R13\nM=D")?;
                self.write_pop_to_d()?;
                write_asm!(self.out, "@R13" "A=M" "M=D")?;
            }
            Some(SegmentSymbol::Static) => {
                self.write_pop_to_d()?;
                writeln!(self.out, "@{}.{index}\nM=D", self.current_source)?;
            }
            Some(SegmentSymbol::Constant) | None => {
                return Err(VmError::UnknownSegment(segment.to_string()))
            }
        }
        Ok(())
    }

    pub fn write_label(&mut self, label: &str) -> Result<(), VmError> {
        writeln!(self.out, "({})", self.label_symbol(label))?;
        Ok(())
    }

    pub fn write_goto(&mut self, label: &str) -> Result<(), VmError> {
        writeln!(self.out, "@{}\n0;JMP", self.label_symbol(label))?;
        Ok(())
    }

    pub fn write_if(&mut self, label: &str) -> Result<(), VmError> {
        write_asm!(self.out,
            "@SP"
            "AM=M-1"
            "D=M"
        )?;
        writeln!(self.out, "@{}\nD;JNE", self.label_symbol(label))?;
        Ok(())
    }

    pub fn write_function(&mut self, function_name: &str, num_locals: i32) -> Result<(), VmError> {
        self.current_function = function_name.to_string();
        writeln!(self.out, "({function_name})")?;
        for _ in 0..num_locals {
            write_asm!(self.out,
                "@SP"
                "A=M"
                "M=0"
                "@SP"
                "M=M+1"
            )?;
        }
        Ok(())
    }

    pub fn write_call(&mut self, function_name: &str, num_args: i32) -> Result<(), VmError> {
        let return_label = format!("{function_name}$ret.{}", self.call_counter);
        self.call_counter += 1;

        writeln!(self.out, "@{return_label}\nD=A")?;
        self.write_push_d()?;
        for segment in ["LCL", "ARG", "THIS", "THAT"] {
            writeln!(self.out, "@{segment}\nD=M")?;
            self.write_push_d()?;
        }
        writeln!(
            self.out,
            "@{}\nD=A\n@SP\nD=M-D\n@ARG\nM=D\n@SP\nD=M\n@LCL\nM=D\n@{function_name}\n0;JMP\n({return_label})",
            num_args + 5,
        )?;
        Ok(())
    }

    pub fn write_return(&mut self) -> Result<(), VmError> {
        write_asm!(self.out,
            "@LCL"
            "D=M"
            "@R15"
            "M=D"
            "@5"
            "A=D-A"
            "D=M"
            "@R14"
            "M=D"
            "@SP"
            "AM=M-1"
            "D=M"
            "@ARG"
            "A=M"
            "M=D"
            "@ARG"
            "D=M+1"
            "@SP"
            "M=D"
        )?;
        for segment in ["THAT", "THIS", "ARG", "LCL"] {
            writeln!(self.out, "@R15\nAM=M-1\nD=M\n@{segment}\nM=D")?;
        }
        write_asm!(self.out, "@R14" "A=M" "0;JMP")?;
        Ok(())
    }

    fn write_push_d(&mut self) -> Result<(), VmError> {
        write_asm!(self.out,
            "@SP"
            "A=M"
            "M=D"
            "@SP"
            "M=M+1"
        )?;
        Ok(())
    }

    fn write_pop_to_d(&mut self) -> Result<(), VmError> {
        write_asm!(self.out,
            "@SP"
            "M=M-1"
            "A=M"
            "D=M"
        )?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), VmError> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(f: impl FnOnce(&mut CodeWriter<Vec<u8>>) -> Result<(), VmError>) -> String {
        let mut writer = CodeWriter::new(Vec::new());
        f(&mut writer).unwrap();
        String::from_utf8(writer.out).unwrap()
    }

    #[test]
    fn push_constant_emits_literal_load() {
        let asm = emit(|w| w.write_push_pop("push", "constant", 17));
        assert!(asm.contains("@17"));
        assert!(asm.contains("D=A"));
    }

    #[test]
    fn static_segment_is_qualified_by_source_file() {
        let mut writer = CodeWriter::new(Vec::new());
        writer.set_current_source("Foo.vm");
        writer.write_push_pop("push", "static", 3).unwrap();
        let asm = String::from_utf8(writer.out).unwrap();
        assert!(asm.contains("@Foo.3"));
    }

    #[test]
    fn labels_are_scoped_by_file_and_function() {
        let mut writer = CodeWriter::new(Vec::new());
        writer.set_current_source("Foo.vm");
        writer.write_function("Foo.bar", 0).unwrap();
        writer.write_label("LOOP").unwrap();
        let asm = String::from_utf8(writer.out).unwrap();
        assert!(asm.contains("(Foo$Foo.bar$LOOP)"));
    }

    #[test]
    fn labels_before_first_function_collapse_to_empty_function_segment() {
        let mut writer = CodeWriter::new(Vec::new());
        writer.set_current_source("Foo.vm");
        writer.write_label("START").unwrap();
        let asm = String::from_utf8(writer.out).unwrap();
        assert!(asm.contains("(Foo$$START)"));
    }

    #[test]
    fn set_current_source_clears_enclosing_function_across_files() {
        let mut writer = CodeWriter::new(Vec::new());
        writer.set_current_source("A.vm");
        writer.write_function("Foo.bar", 0).unwrap();

        writer.set_current_source("B.vm");
        writer.write_label("START").unwrap();
        let asm = String::from_utf8(writer.out).unwrap();
        assert!(asm.contains("(B$$START)"));
        assert!(!asm.contains("(B$Foo.bar$START)"));
    }

    #[test]
    fn unknown_arithmetic_command_is_rejected() {
        let mut writer = CodeWriter::new(Vec::new());
        assert!(writer.write_arithmetic("xor").is_err());
    }

    #[test]
    fn unknown_segment_is_rejected() {
        let mut writer = CodeWriter::new(Vec::new());
        assert!(writer.write_push_pop("push", "bogus", 0).is_err());
    }
}
