//! Deterministic, clamped execution of a nucleo program against an input
//! `n` (spec.md §4.4). Execution always halts: a step counter increments
//! on every nucleo dispatched (loop bodies included) and execution stops
//! the instant it reaches `MAX_STEPS`, returning the current `R0`.

use super::opcode::{clamp_register, InstructionSet, Opcode};

/// Default bound on nucleo dispatches per `vm_run` call.
pub const MAX_STEPS: u32 = 1000;

/// `R0..R3`. `R0` is the conventional output register.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers(pub [u64; 4]);

impl Registers {
    /// `R0=0, R1=1, R2=0, R3=0` (spec.md §3).
    pub fn initial() -> Self {
        Registers([0, 1, 0, 0])
    }
}

#[derive(Clone, Copy, Debug)]
struct Nucleo {
    opcode: Opcode,
    dest: usize,
    src: usize,
}

fn decode(genome: &[u8], set: InstructionSet) -> Vec<Nucleo> {
    genome
        .chunks_exact(3)
        .map(|chunk| Nucleo {
            opcode: Opcode::from_raw(chunk[0], set),
            dest: clamp_register(chunk[1]),
            src: clamp_register(chunk[2]),
        })
        .collect()
}

/// Runs a genome as a clamped nucleo program against input `n`, returning
/// the final `R0`. Pure function of `(genome, set, n, max_steps)`.
pub fn run(genome: &[u8], set: InstructionSet, n: u64, max_steps: u32) -> u64 {
    let program = decode(genome, set);
    if program.is_empty() {
        return Registers::initial().0[0];
    }
    let mut regs = Registers::initial();
    let mut pc: usize = 0;
    let mut steps: u32 = 0;

    while pc < program.len() && steps < max_steps {
        let nucleo = program[pc];
        let mut jumped = false;
        match nucleo.opcode {
            Opcode::Nop => {}
            Opcode::Zero => regs.0[nucleo.dest] = 0,
            Opcode::Inc => regs.0[nucleo.dest] = regs.0[nucleo.dest].wrapping_add(1),
            Opcode::Mov => regs.0[nucleo.dest] = regs.0[nucleo.src],
            Opcode::Add => regs.0[nucleo.dest] = regs.0[nucleo.dest].wrapping_add(regs.0[nucleo.src]),
            Opcode::Swap => regs.0.swap(nucleo.dest, nucleo.src),
            Opcode::LoadN => regs.0[nucleo.dest] = n,
            Opcode::Const1 => regs.0[nucleo.dest] = 1,
            Opcode::Const0 => regs.0[nucleo.dest] = 0,
            Opcode::Dec => regs.0[nucleo.dest] = regs.0[nucleo.dest].saturating_sub(1),
            Opcode::Double => regs.0[nucleo.dest] = regs.0[nucleo.dest].wrapping_mul(2),
            Opcode::Loop => {
                if regs.0[nucleo.src] > 0 {
                    regs.0[nucleo.src] -= 1;
                    // `dest` doubles as the jump target, clamped the same
                    // way every other register field is (mod 4), then
                    // clamped again to the program length so a short
                    // program can never put PC out of range.
                    pc = nucleo.dest % program.len();
                    jumped = true;
                }
            }
        }
        steps += 1;
        if !jumped {
            pc += 1;
        }
    }
    regs.0[0]
}

/// The Fibonacci domain has no native looping opcode; instead the whole
/// straight-line body is re-executed `n` times externally. This is a
/// property of that domain, not the VM (spec.md §4.4 "Fibonacci variant").
pub fn run_repeated(genome: &[u8], set: InstructionSet, n: u64, max_steps: u32) -> u64 {
    let mut last = Registers::initial().0[0];
    let repetitions = n.max(1);
    for _ in 0..repetitions {
        last = run(genome, set, n, max_steps);
    }
    last
}
