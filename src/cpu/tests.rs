// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Unit tests for [super::CPU]
//!
//! Handlers are called directly where a property is easiest to state for one
//! instruction, and driven through [CPU::tick] where the cycle itself matters.

use super::*;
use crate::cpu::mem::Get;
use rand::random;


/// A machine with `program` loaded at 0x200
fn boot(program: &[u8]) -> CPU {
    let mut cpu = CPU::default();
    cpu.load_program_bytes(program).unwrap();
    cpu
}

/// A machine spinning on `jp 200`
fn idle() -> CPU {
    boot(&[0x12, 0x00])
}

/// Operands worth trying: both ends, both sides of the nibble and sign boundaries, and some noise
const BYTES: [u8; 12] = [0x00, 0x01, 0x02, 0x0f, 0x10, 0x7f, 0x80, 0x81, 0xa5, 0xc3, 0xfe, 0xff];

mod alu {
    use super::*;

    /// Reference behavior of an `8xyN` handler: given vX and vY, the value vX
    /// should hold afterwards, and what vF should hold if the instruction writes it
    type Model = fn(u8, u8) -> (u8, Option<u8>);

    /// Runs `handler` over every register pair and operand combination,
    /// comparing the machine against `model`
    fn check(quirks: Quirks, handler: fn(&mut CPU, Reg, Reg), model: Model) {
        let mut cpu = idle();
        cpu.flags.quirks = quirks;
        for (x, y) in (0..16).flat_map(|x| (0..16).map(move |y| (x, y))) {
            for (a, b) in BYTES.iter().flat_map(|&a| BYTES.iter().map(move |&b| (a, b))) {
                cpu.pc = 0x200;
                cpu.v[0xf] = 0x5a;
                (cpu.v[x], cpu.v[y]) = (a, b);
                let (vx, vy, vf) = (cpu.v[x], cpu.v[y], cpu.v[0xf]);

                handler(&mut cpu, x, y);

                let (result, flag) = model(vx, vy);
                let case = format!("x={x:x} y={y:x} vX={vx:02x} vY={vy:02x}");
                match flag {
                    // when x is F, the flag overwrites the result
                    Some(flag) => {
                        assert_eq!(flag, cpu.v[0xf], "vF, {case}");
                        if x != 0xf {
                            assert_eq!(result, cpu.v[x], "vX, {case}");
                        }
                    }
                    None => {
                        assert_eq!(result, cpu.v[x], "vX, {case}");
                        if x != 0xf {
                            assert_eq!(vf, cpu.v[0xf], "vF untouched, {case}");
                        }
                    }
                }
                assert_eq!(0x202, cpu.pc);
            }
        }
    }

    const VIP: Quirks = Quirks {
        bin_ops: false,
        shift: false,
    };
    const MODERN: Quirks = Quirks {
        bin_ops: true,
        shift: true,
    };

    #[test]
    fn load() {
        check(VIP, CPU::load, |_, y| (y, None));
    }

    #[test]
    fn bitwise_clears_flag() {
        check(VIP, CPU::or, |x, y| (x | y, Some(0)));
        check(VIP, CPU::and, |x, y| (x & y, Some(0)));
        check(VIP, CPU::xor, |x, y| (x ^ y, Some(0)));
    }

    #[test]
    fn bitwise_keeps_flag_when_quirked() {
        check(MODERN, CPU::or, |x, y| (x | y, None));
        check(MODERN, CPU::and, |x, y| (x & y, None));
        check(MODERN, CPU::xor, |x, y| (x ^ y, None));
    }

    #[test]
    fn add() {
        check(VIP, CPU::add, |x, y| {
            let (sum, carry) = x.overflowing_add(y);
            (sum, Some(carry.into()))
        });
    }

    #[test]
    fn sub() {
        check(VIP, CPU::sub, |x, y| (x.wrapping_sub(y), Some((x >= y).into())));
    }

    #[test]
    fn backwards_sub() {
        check(VIP, CPU::backwards_sub, |x, y| {
            (y.wrapping_sub(x), Some((y >= x).into()))
        });
    }

    #[test]
    fn shifts_read_vy() {
        check(VIP, CPU::shift_right, |_, y| (y >> 1, Some(y & 1)));
        check(VIP, CPU::shift_left, |_, y| (y << 1, Some(y >> 7)));
    }

    #[test]
    fn shifts_read_vx_when_quirked() {
        check(MODERN, CPU::shift_right, |x, _| (x >> 1, Some(x & 1)));
        check(MODERN, CPU::shift_left, |x, _| (x << 1, Some(x >> 7)));
    }

    #[test]
    fn carry_into_flag_register() {
        // 8F04 with vF = 0xff, v0 = 0x01: the sum is 0, but the carry wins
        let mut cpu = boot(&[0x8f, 0x04]);
        (cpu.v[0], cpu.v[0xf]) = (0x01, 0xff);
        cpu.tick().unwrap();
        assert_eq!(1, cpu.v[0xf]);
    }

    #[test]
    fn add_immediate_wraps_without_flag() {
        let mut cpu = idle();
        for (x, b) in (0..16).zip(BYTES.iter().cycle()) {
            cpu.v[0xf] = 0x5a;
            cpu.v[x] = 0xf0;
            cpu.add_immediate(x, *b);
            assert_eq!(0xf0u8.wrapping_add(*b), cpu.v[x]);
            if x != 0xf {
                assert_eq!(0x5a, cpu.v[0xf]);
            }
        }
    }

    #[test]
    fn rand_respects_mask() {
        let mut cpu = idle();
        for mask in BYTES {
            for _ in 0..64 {
                cpu.v[7] = !mask;
                cpu.rand(7, mask);
                assert_eq!(0, cpu.v[7] & !mask);
            }
        }
    }

    #[test]
    fn rand_is_not_constant() {
        let mut cpu = idle();
        let seen: std::collections::HashSet<u8> = (0..256)
            .map(|_| {
                cpu.rand(0, 0xff);
                cpu.v[0]
            })
            .collect();
        assert!(seen.len() > 1);
    }
}

mod flow {
    use super::*;

    #[test]
    fn register_skips_are_complementary() {
        let mut cpu = idle();
        for (x, y) in (0..16).flat_map(|x| (0..16).map(move |y| (x, y))) {
            for (a, b) in [(3, 3), (3, 4), (0xff, 0), (0, 0)] {
                (cpu.v[x], cpu.v[y]) = (a, b);
                let equal = cpu.v[x] == cpu.v[y];

                cpu.pc = 0x300;
                cpu.skip_equals(x, y);
                let taken = cpu.pc - 0x300;
                cpu.pc = 0x300;
                cpu.skip_not_equals(x, y);
                let not_taken = cpu.pc - 0x300;

                assert_eq!(if equal { (4, 2) } else { (2, 4) }, (taken, not_taken));
            }
        }
    }

    #[test]
    fn immediate_skips_are_complementary() {
        let mut cpu = idle();
        for x in 0..16 {
            for (a, b) in BYTES.iter().zip(BYTES.iter().rev()) {
                cpu.v[x] = *a;
                cpu.pc = 0x400;
                cpu.skip_equals_immediate(x, *b);
                let taken = cpu.pc - 0x400;
                cpu.pc = 0x400;
                cpu.skip_not_equals_immediate(x, *b);
                let not_taken = cpu.pc - 0x400;
                assert_eq!(6, taken + not_taken);
                assert_eq!(a == b, taken == 4);
            }
        }
    }

    #[test]
    fn jump_indexed_adds_v0() {
        let mut cpu = idle();
        for (base, v0) in [(0x000, 0x00), (0x300, 0x10), (0xfff, 0xff)] {
            cpu.v[0] = v0;
            cpu.jump_indexed(base);
            assert_eq!(base + Adr::from(v0), cpu.pc);
        }
    }

    #[test]
    fn jump_indexed_past_memory_fails_at_fetch() {
        let mut cpu = boot(&[0xbf, 0xff]);
        cpu.v[0] = 0x10;
        cpu.tick().expect("the jump itself is fine");
        assert_eq!(0x100f, cpu.pc);
        match cpu.tick() {
            Err(Error::InvalidAddressRange { range }) => assert_eq!(0x100f..0x1011, range),
            other => panic!("{other:?}"),
        }
        assert_eq!(1, cpu.cycle);
    }

    #[test]
    fn call_and_return() {
        let mut cpu = boot(&[
            0x22, 0x06, // 200: call 206
            0x6e, 0x0e, // 202: ld   ve, #0e
            0x12, 0x04, // 204: jp   204
            0x6d, 0x0d, // 206: ld   vd, #0d
            0x00, 0xee, // 208: ret
        ]);
        cpu.tick().unwrap();
        assert_eq!((0x206, &[0x200u16][..]), (cpu.pc, cpu.stack()));
        cpu.multistep(2).unwrap();
        assert_eq!(0x202, cpu.pc);
        assert!(cpu.stack.is_empty());
        cpu.multistep(2).unwrap();
        assert_eq!((0x0d, 0x0e), (cpu.v[0xd], cpu.v[0xe]));
        assert_eq!(0x204, cpu.pc);
    }

    #[test]
    fn seventeenth_call_overflows() {
        // 200: call 200, forever
        let mut cpu = boot(&[0x22, 0x00]);
        cpu.delay = 0x40;
        cpu.multistep(STACK_DEPTH).expect("sixteen frames fit");
        assert_eq!([0x200u16; STACK_DEPTH][..], cpu.stack[..]);
        let before = cpu.clone();
        match cpu.tick() {
            Err(Error::StackOverflow { addr, target, depth }) => {
                assert_eq!((0x200, 0x200, STACK_DEPTH), (addr, target, depth));
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(before, cpu);
    }

    #[test]
    fn return_with_empty_stack() {
        let mut cpu = boot(&[0x00, 0xee]);
        let before = cpu.clone();
        match cpu.tick() {
            Err(Error::StackUnderflow { addr }) => assert_eq!(0x200, addr),
            other => panic!("{other:?}"),
        }
        assert_eq!(before, cpu);
    }
}

mod display {
    use super::*;

    /// Parks `rows` at 0x300 and points I at them
    fn sprite(cpu: &mut CPU, rows: &[u8]) {
        cpu.mem.load_at(0x300, rows).unwrap();
        cpu.i = 0x300;
    }

    #[test]
    fn glyph_pixels_match_font_bits() {
        let mut cpu = idle();
        for digit in 0..16u8 {
            cpu.screen.clear();
            (cpu.v[0xa], cpu.v[1], cpu.v[2]) = (digit, 10, 20);
            cpu.load_sprite(0xa);
            cpu.draw(1, 2, 5).unwrap();
            let glyph = &FONT[digit as usize * 5..][..5];
            for (dy, row) in glyph.iter().enumerate() {
                for dx in 0..8 {
                    let lit = row & (0x80 >> dx) != 0;
                    assert_eq!(lit, cpu.screen.get(10 + dx, 20 + dy), "{digit:x} @ {dx},{dy}");
                }
            }
            assert_eq!(0, cpu.v[0xf]);
        }
    }

    #[test]
    fn second_draw_erases_and_collides() {
        let mut cpu = idle();
        // a 14-pixel ring
        sprite(&mut cpu, &[0x3c, 0x42, 0x81, 0x42, 0x3c]);
        (cpu.v[3], cpu.v[4]) = (random::<u8>(), random::<u8>());
        cpu.draw(3, 4, 5).unwrap();
        assert_eq!((0, 14), (cpu.v[0xf], cpu.screen.lit()));
        cpu.draw(3, 4, 5).unwrap();
        assert_eq!((1, 0), (cpu.v[0xf], cpu.screen.lit()));
        assert!(cpu.flags.draw);
    }

    #[test]
    fn corner_wraps_both_ways() {
        let mut cpu = idle();
        sprite(&mut cpu, &[0xff, 0xff]);
        (cpu.v[0], cpu.v[1]) = (63, 31);
        cpu.draw(0, 1, 2).unwrap();
        for y in [31, 0] {
            for x in [63, 0, 1, 2, 3, 4, 5, 6] {
                assert!(cpu.screen.get(x, y), "({x}, {y})");
            }
        }
        assert_eq!(16, cpu.screen.lit());
    }

    #[test]
    fn origin_is_reduced_modulo_screen() {
        let mut cpu = idle();
        sprite(&mut cpu, &[0x80]);
        (cpu.v[0], cpu.v[1]) = (64 + 5, 32 * 3 + 7);
        cpu.draw(0, 1, 1).unwrap();
        assert!(cpu.screen.get(5, 7));
        assert_eq!(1, cpu.screen.lit());
    }

    #[test]
    fn one_collision_is_enough() {
        let mut cpu = idle();
        sprite(&mut cpu, &[0x80, 0x00, 0x01]);
        cpu.screen.set(0, 0, true);
        (cpu.v[0], cpu.v[1]) = (0, 0);
        cpu.draw(0, 1, 3).unwrap();
        assert_eq!(1, cpu.v[0xf]);
        assert!(!cpu.screen.get(0, 0));
        assert!(cpu.screen.get(7, 2));
    }

    #[test]
    fn empty_sprite_clears_flag() {
        let mut cpu = idle();
        cpu.v[0xf] = 1;
        cpu.draw(0, 1, 0).unwrap();
        assert_eq!((0, 0), (cpu.v[0xf], cpu.screen.lit()));
    }

    #[test]
    fn sprite_past_memory_is_refused() {
        let mut cpu = idle();
        cpu.i = 0xffc;
        let before = cpu.clone();
        match cpu.draw(0, 1, 5) {
            Err(Error::InvalidAddressRange { range }) => assert_eq!(0xffc..0x1001, range),
            other => panic!("{other:?}"),
        }
        assert_eq!(before, cpu);
    }

    #[test]
    fn clear_screen() {
        let mut cpu = boot(&[0x00, 0xe0]);
        cpu.screen.fill(true);
        cpu.tick().unwrap();
        assert_eq!(0, cpu.screen.lit());
        assert!(cpu.flags.take_draw());
    }
}

mod input {
    use super::*;

    #[test]
    fn key_skips_track_every_key() {
        let mut cpu = idle();
        for key in 0..16u8 {
            cpu.keys = [false; 16];
            cpu.keys[key as usize] = true;
            for asked in 0..16u8 {
                // garbage in the high nibble is ignored
                cpu.v[9] = asked | 0xa0;
                cpu.pc = 0x200;
                cpu.skip_key_equals(9);
                assert_eq!(if asked == key { 0x204 } else { 0x202 }, cpu.pc);
                cpu.pc = 0x200;
                cpu.skip_key_not_equals(9);
                assert_eq!(if asked == key { 0x202 } else { 0x204 }, cpu.pc);
            }
        }
    }

    #[test]
    fn wait_with_nothing_held() {
        let mut cpu = idle();
        cpu.v[4] = 0x77;
        cpu.wait_for_key(4);
        assert!(cpu.flags.keypause);
        assert_eq!((0x200, 0x77), (cpu.pc, cpu.v[4]));
    }

    #[test]
    fn wait_takes_the_lowest_held_key() {
        let mut cpu = idle();
        for key in [0xc, 0x5, 0x9] {
            cpu.press(key).unwrap();
        }
        cpu.flags.keypause = true;
        cpu.wait_for_key(4);
        assert!(!cpu.flags.keypause);
        assert_eq!((0x202, 0x5), (cpu.pc, cpu.v[4]));
    }

    #[test]
    fn wait_spans_cycles_while_timers_run() {
        let mut cpu = boot(&[0xf3, 0x0a]);
        cpu.delay = 10;
        cpu.multistep(4).expect("waiting is not an error");
        assert_eq!((0x200, 6, 4), (cpu.pc, cpu.delay, cpu.cycle));
        cpu.press(0xb).unwrap();
        cpu.tick().unwrap();
        assert_eq!((0x202, 0xb), (cpu.pc, cpu.v[3]));
    }

    #[test]
    fn press_and_release_report_changes() {
        let mut cpu = idle();
        assert!(cpu.press(0xe).unwrap());
        assert!(!cpu.press(0xe).unwrap());
        assert!(cpu.keys()[0xe]);
        assert!(cpu.release(0xe).unwrap());
        assert!(!cpu.release(0xe).unwrap());
    }

    #[test]
    fn out_of_range_key_and_register() {
        let mut cpu = idle();
        assert!(matches!(cpu.press(0x10), Err(Error::InvalidKey { key: 0x10 })));
        assert!(matches!(cpu.release(0x11), Err(Error::InvalidKey { key: 0x11 })));
        assert!(matches!(
            cpu.set_v(0x10, 1),
            Err(Error::InvalidRegister { reg: 0x10 })
        ));
        assert_eq!(idle(), cpu);
    }
}

mod timers {
    use super::*;

    #[test]
    fn count_down_once_per_cycle_and_stop_at_zero() {
        let mut cpu = idle();
        (cpu.delay, cpu.sound) = (10, 3);
        cpu.multistep(5).unwrap();
        assert_eq!((5, 0), (cpu.delay, cpu.sound));
        cpu.multistep(20).unwrap();
        assert_eq!((0, 0), (cpu.delay, cpu.sound));
    }

    #[test]
    fn written_value_ticks_in_the_same_cycle() {
        let mut cpu = boot(&[
            0x6a, 0x05, // ld vA, #05
            0xfa, 0x15, // ld dt, vA
            0xfa, 0x18, // ld st, vA
            0xfb, 0x07, // ld vB, dt
        ]);
        cpu.multistep(2).unwrap();
        assert_eq!(4, cpu.delay);
        cpu.tick().unwrap();
        assert_eq!((3, 4), (cpu.delay, cpu.sound));
        cpu.tick().unwrap();
        assert_eq!(3, cpu.v[0xb]);
    }

    #[test]
    fn hold_when_the_instruction_fails() {
        let mut cpu = boot(&[0xff, 0xff]);
        (cpu.delay, cpu.sound) = (7, 9);
        cpu.tick().expect_err("ffff does not decode");
        assert_eq!((7, 9, 0), (cpu.delay, cpu.sound, cpu.cycle));
    }
}

mod index {
    use super::*;

    #[test]
    fn add_i_can_leave_memory() {
        let mut cpu = boot(&[
            0x60, 0x01, // ld  v0, #01
            0xf0, 0x1e, // add i, v0
            0xf0, 0x33, // ld  bcd, v0
        ]);
        cpu.i = 0xfff;
        cpu.multistep(2).unwrap();
        assert_eq!(0x1000, cpu.i);
        let before = cpu.clone();
        match cpu.tick() {
            Err(Error::InvalidAddressRange { range }) => assert_eq!(0x1000..0x1003, range),
            other => panic!("{other:?}"),
        }
        assert_eq!(before, cpu);
    }

    #[test]
    fn sprite_lookup_ignores_high_nibble() {
        let mut cpu = idle();
        for digit in 0..16u8 {
            cpu.v[2] = digit | random::<u8>() & 0xf0;
            cpu.load_sprite(2);
            let start = cpu.i as usize;
            let glyph: &[u8] = cpu.mem.get(start..start + 5).unwrap();
            assert_eq!(&FONT[digit as usize * 5..][..5], glyph);
        }
    }

    #[test]
    fn bcd_digits() {
        let mut cpu = idle();
        let cases = [
            (0, [0, 0, 0]),
            (9, [0, 0, 9]),
            (10, [0, 1, 0]),
            (127, [1, 2, 7]),
            (255, [2, 5, 5]),
        ];
        for (value, digits) in cases {
            cpu.v[6] = value;
            cpu.i = 0x480;
            cpu.bcd_convert(6).unwrap();
            assert_eq!(Some(&digits[..]), cpu.mem.get(0x480..0x483));
            assert_eq!(0x480, cpu.i);
        }
    }

    #[test]
    fn bcd_at_the_last_three_bytes() {
        // ld vF, #c8; ld bcd, vF
        let mut cpu = boot(&[0x6f, 0xc8, 0xff, 0x33]);
        cpu.i = 0xffd;
        cpu.multistep(2).unwrap();
        assert_eq!(Some(&[2, 0, 0][..]), cpu.mem.get(0xffd..));

        let mut cpu = boot(&[0xff, 0x33]);
        (cpu.i, cpu.delay) = (0xffe, 3);
        let before = cpu.clone();
        cpu.tick().expect_err("0xffe..0x1001 is outside memory");
        assert_eq!(before, cpu);
    }

    #[test]
    fn store_writes_count_bytes_and_advances_i() {
        const DATA: &[u8; 16] = b"0123456789abcdef";
        for x in 0..16 {
            let mut cpu = idle();
            cpu.v = *DATA;
            cpu.i = 0x456;
            cpu.store_dma(x).unwrap();
            assert_eq!(0x456 + x as Adr + 1, cpu.i);
            let written = cpu.mem.get(0x456..0x466).unwrap();
            assert_eq!(DATA[..=x], written[..=x]);
            assert!(written[x + 1..].iter().all(|&byte| byte == 0));
        }
    }

    #[test]
    fn load_reads_count_bytes_and_advances_i() {
        const DATA: &[u8; 16] = b"fedcba9876543210";
        for x in 0..16 {
            let mut cpu = idle();
            cpu.mem.load_at(0x456, DATA).unwrap();
            cpu.i = 0x456;
            cpu.load_dma(x).unwrap();
            assert_eq!(0x456 + x as Adr + 1, cpu.i);
            assert_eq!(DATA[..=x], cpu.v[..=x]);
            assert!(cpu.v[x + 1..].iter().all(|&reg| reg == 0));
        }
    }

    #[test]
    fn store_then_load_all_sixteen() {
        let mut cpu = boot(&[
            0xa4, 0x00, // ld i, 400
            0xff, 0x55, // ld [i], v0-vf
            0xa4, 0x00, // ld i, 400
            0xff, 0x65, // ld v0-vf, [i]
        ]);
        for (n, reg) in cpu.v.iter_mut().enumerate() {
            *reg = n as u8 * 0x11;
        }
        let saved = cpu.v;
        cpu.multistep(2).unwrap();
        assert_eq!(0x410, cpu.i);
        cpu.v = [0; 16];
        cpu.multistep(2).unwrap();
        assert_eq!(0x410, cpu.i);
        assert_eq!(saved, cpu.v);
    }

    #[test]
    fn transfers_past_memory_are_refused() {
        let mut cpu = idle();
        cpu.i = 0xffe;
        let before = cpu.clone();
        cpu.store_dma(4).expect_err("0xffe..0x1003 is outside memory");
        cpu.load_dma(4).expect_err("0xffe..0x1003 is outside memory");
        assert_eq!(before, cpu);
    }
}

mod engine {
    use super::*;

    #[test]
    fn undecodable_words_change_nothing() {
        for word in [0x0420u16, 0x500f, 0x800f, 0x900f, 0xe00f, 0xf00f] {
            let mut cpu = idle();
            cpu.mem.write(PROGRAM_START, word).unwrap();
            let before = cpu.clone();
            match cpu.tick() {
                Err(Error::UnimplementedInstruction { word: got }) => assert_eq!(word, got),
                other => panic!("{word:04x}: {other:?}"),
            }
            assert_eq!(before, cpu);
        }
    }

    #[test]
    fn fetch_past_memory() {
        let mut cpu = idle();
        cpu.pc = 0xfff;
        match cpu.tick() {
            Err(Error::InvalidAddressRange { range }) => assert_eq!(0xfff..0x1001, range),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn breakpoint_reports_after_executing() {
        let mut cpu = boot(&[
            0x00, 0xe0, // 200: cls
            0x12, 0x04, // 202: jp 204
            0x12, 0x04, // 204: jp 204
        ]);
        cpu.set_break(0x202);
        match cpu.multistep(10) {
            Err(Error::BreakpointHit { addr, next }) => assert_eq!((0x202, 0x1204), (addr, next)),
            other => panic!("{other:?}"),
        }
        assert_eq!((0x202, 1), (cpu.pc, cpu.cycle));
        // stepping on from a breakpoint is allowed
        cpu.tick().unwrap();
        assert_eq!(0x204, cpu.pc);
    }

    #[test]
    fn breakpoints_are_a_set() {
        let mut cpu = idle();
        cpu.set_break(0x200).set_break(0x200).set_break(0x3c0);
        assert_eq!(&[0x200u16, 0x3c0][..], cpu.breakpoints());
        cpu.unset_break(0x200).unset_break(0x200);
        assert_eq!(&[0x3c0u16][..], cpu.breakpoints());
        cpu.multistep(10).expect("0x3c0 is never reached");
    }

    #[test]
    fn reset_keeps_program_quirks_and_breakpoints() {
        let mut cpu = boot(&[0x00, 0xe0, 0x12, 0x02]);
        cpu.set_break(0x300);
        cpu.flags.quirks.shift = true;
        cpu.mem.get_region_mut(Charset).fill(0xaa);
        cpu.multistep(3).unwrap();
        (cpu.i, cpu.delay, cpu.sound, cpu.v[3]) = (0x123, 4, 2, 5);
        cpu.stack.push(0x222);
        cpu.press(2).unwrap();

        cpu.reset();

        assert_eq!((0x200, 0, 0), (cpu.pc, cpu.i, cpu.cycle));
        assert_eq!((0, 0), (cpu.delay, cpu.sound));
        assert_eq!([0; 16], cpu.v);
        assert!(cpu.stack.is_empty());
        assert_eq!([false; 16], cpu.keys);
        assert_eq!(&FONT[..], cpu.mem.get_region(Charset));
        assert_eq!(Some(&[0x00, 0xe0][..]), cpu.mem.get(0x200..0x202));
        assert!(cpu.flags.quirks.shift);
        assert_eq!(&[0x300u16][..], cpu.breakpoints());
    }

    #[test]
    fn program_must_fit() {
        let mut cpu = idle();
        cpu.load_program_bytes(&[0xa5; 0xe01])
            .expect_err("program space is 0xe00 bytes");
        assert_eq!(Some(&[0x12, 0x00][..]), cpu.mem.get(0x200..0x202));
        cpu.load_program_bytes(&[0xa5; 0xe00])
            .expect("a program may fill program space exactly");
        assert_eq!(Some(&0xa5), cpu.mem.get(0xfff));
    }

    #[test]
    fn loading_clears_the_previous_program() {
        let mut cpu = boot(&[0xaa; 0x10]);
        cpu.load_program_bytes(&[0x12, 0x00]).unwrap();
        assert_eq!(Some(&[0x12, 0x00, 0x00, 0x00][..]), cpu.mem.get(0x200..0x204));
    }

    #[test]
    fn memory_can_be_patched_between_cycles() {
        let mut cpu = idle();
        cpu.tick().unwrap();
        cpu.mem_mut().write(0x200usize, 0x6c2au16).unwrap();
        cpu.tick().unwrap();
        assert_eq!(0x2a, cpu.v[0xc]);
    }
}
