use emu8_core::{Chip8, Config, Effect, Error, Register, Trace, HALT};

/// Steps until the halt word, giving up after `limit` steps
fn run_until_halt(chip8: &mut Chip8, limit: usize) -> usize {
    for steps in 1..=limit {
        if chip8.step().unwrap() == HALT {
            return steps;
        }
    }
    panic!("program didn't halt within {limit} steps");
}

fn v(index: u8) -> Register {
    Register::try_from(index).unwrap()
}

#[test]
fn test_subroutine_stores_bcd_of_a_sum() {
    let program = [
        0x60, 0x64, // LD V0, 100
        0x61, 0x17, // LD V1, 23
        0x22, 0x0A, // CALL 0x20A
        0xA3, 0x00, // LD I, 0x300
        0x00, 0x00, // HALT
        0x80, 0x14, // 0x20A: ADD V0, V1
        0xA3, 0x00, // LD I, 0x300
        0xF0, 0x33, // LD B, V0
        0x00, 0xEE, // RET
    ];
    let mut chip8 = Chip8::new();
    chip8.load(&program, 0x200).unwrap();

    let steps = run_until_halt(&mut chip8, 32);

    assert_eq!(steps, 9);
    let state = chip8.state();
    assert_eq!(state.registers.v(v(0x0)), 123);
    assert_eq!(state.registers.flag(), 0);
    assert_eq!(state.memory.slice(0x300, 3).unwrap(), &[1, 2, 3]);
    assert_eq!(state.registers.sp(), 0);
}

#[test]
fn test_counting_loop_with_skip() {
    let program = [
        0x60, 0x00, // LD V0, 0
        0x70, 0x01, // 0x202: ADD V0, 1
        0x30, 0x0A, // SE V0, 10
        0x12, 0x02, // JP 0x202
        0x00, 0x00, // HALT
    ];
    let mut chip8 = Chip8::new();
    chip8.load(&program, 0x200).unwrap();

    run_until_halt(&mut chip8, 64);

    assert_eq!(chip8.state().registers.v(v(0x0)), 10);
    assert_eq!(chip8.state().registers.pc, 0x20A);
}

#[test]
fn test_delay_timer_is_paced_by_frames() {
    let program = [
        0x60, 0x03, // LD V0, 3
        0xF0, 0x15, // LD DT, V0
        0xF1, 0x07, // 0x204: LD V1, DT
        0x31, 0x00, // SE V1, 0
        0x12, 0x04, // JP 0x204
        0x00, 0x00, // HALT
    ];
    let mut chip8 = Chip8::with_config(Config {
        clock_speed: 120,
        ..Config::default()
    });
    chip8.load(&program, 0x200).unwrap();

    let mut frames = 0;
    while !chip8.run_frame().unwrap() {
        frames += 1;
        assert!(frames < 100, "delay timer never reached zero");
    }

    // Two instructions and one tick per frame
    assert_eq!(frames, 5);
    assert_eq!(chip8.state().registers.timers.delay, 0);
}

#[test]
fn test_await_key_blocks_until_pressed() {
    let program = [
        0xF2, 0x0A, // LD V2, K
        0x72, 0x01, // ADD V2, 1
        0x00, 0x00, // HALT
    ];
    let mut chip8 = Chip8::new();
    chip8.load(&program, 0x200).unwrap();

    chip8.step().unwrap();
    for _ in 0..3 {
        assert_eq!(chip8.step().unwrap(), 0xF20A);
    }
    assert!(chip8.is_waiting_for_key());

    chip8.key_press(0x7).unwrap();
    run_until_halt(&mut chip8, 4);
    assert_eq!(chip8.state().registers.v(v(0x2)), 0x8);
}

#[test]
fn test_draw_digit_from_sprite_sheet() {
    let program = [
        0x60, 0x08, // LD V0, 8
        0xF0, 0x29, // LD F, V0
        0x61, 0x00, // LD V1, 0
        0xD1, 0x15, // DRW V1, V1, 5
        0xD1, 0x15, // DRW V1, V1, 5
        0x00, 0x00, // HALT
    ];
    let mut chip8 = Chip8::new();
    chip8.load(&program, 0x200).unwrap();

    let mut traces: Vec<Trace> = Vec::new();
    while chip8.step_traced(&mut traces).unwrap() != HALT {}

    assert_eq!(chip8.state().registers.i, 0x28);
    // The second draw erases the first
    assert_eq!(traces[3].effect, Effect::Draw { collision: false });
    assert_eq!(traces[4].effect, Effect::Draw { collision: true });
    assert!(chip8.frame_buffer().iter().flatten().all(|pixel| *pixel == 0));
}

#[test]
fn test_runaway_recursion_overflows_the_stack() {
    let program = [
        0x22, 0x00, // CALL 0x200
    ];
    let mut chip8 = Chip8::new();
    chip8.load(&program, 0x200).unwrap();

    for _ in 0..16 {
        chip8.step().unwrap();
    }
    assert!(matches!(chip8.step(), Err(Error::StackOverflow)));
    assert_eq!(chip8.state().registers.sp(), 16);
}
