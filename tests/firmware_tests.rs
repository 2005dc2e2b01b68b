//! Integration tests for the Firmware boot sequence and tick entry point

mod common;
use common::*;

use duolight::{
    Command, ConfigError, EMPTY_CELL, FLASHLIGHT, Firmware, FirmwareConfig, Light, ModeId,
    Thresholds,
};

type TestFirmware = Firmware<MockOutput, RamCells<64>, 64>;

fn firmware(cells: RamCells<64>) -> TestFirmware {
    Firmware::new(&FLASHLIGHT, MockOutput::new(), cells, FirmwareConfig::DEFAULT)
}

fn boot(firmware: &mut TestFirmware, reading: u8) -> Command {
    let mut sensor = MockSensor(reading);
    let mut timer = MockTimer::new();
    firmware.boot(&mut sensor, &mut timer)
}

#[test]
fn cold_boot_on_empty_store_starts_both_lights_in_moon() {
    let mut fw = firmware(RamCells::erased());

    let command = boot(&mut fw, COLD);

    assert_eq!(command, Command::ColdBoot);
    assert_eq!(fw.light(Light::Primary).mode(), ModeId::Moon);
    assert_eq!(fw.light(Light::Secondary).mode(), ModeId::Moon);

    let report = fw.tick();
    assert_eq!(report.level(Light::Primary), Some(3));
    assert_eq!(report.level(Light::Secondary), Some(3));

    // One save: cell 0 erased, cell 1 written
    let cells = fw.store().storage();
    assert_eq!(cells.writes(), &[(0, EMPTY_CELL), (1, 0x11)]);
    assert_eq!(cells.occupied().as_slice(), &[1]);
}

#[test]
fn short_press_cycles_primary_and_persists_one_cell() {
    let mut fw = firmware(RamCells::holding(9, state(ModeId::Low, ModeId::Moon)));

    let command = boot(&mut fw, SHORT_PRESS);

    assert_eq!(command, Command::Cycle(Light::Primary));
    assert_eq!(fw.light(Light::Primary).mode(), ModeId::Medium);
    assert_eq!(fw.light(Light::Secondary).mode(), ModeId::Moon);

    let cells = fw.store().storage();
    assert_eq!(cells.occupied().as_slice(), &[10]);
    assert_eq!(cells.cells[10], state(ModeId::Medium, ModeId::Moon).encode());
}

#[test]
fn medium_press_cycles_secondary_only() {
    let mut fw = firmware(RamCells::holding(0, state(ModeId::High, ModeId::High)));

    let command = boot(&mut fw, MEDIUM_PRESS);

    assert_eq!(command, Command::Cycle(Light::Secondary));
    assert_eq!(fw.persisted(), state(ModeId::High, ModeId::Blink));
    assert_eq!(fw.store().cursor(), 1);
}

#[test]
fn cold_boot_overrides_persisted_modes() {
    let mut fw = firmware(RamCells::holding(30, state(ModeId::Turbo, ModeId::Blink)));

    boot(&mut fw, COLD);

    assert_eq!(fw.persisted(), state(ModeId::Moon, ModeId::Moon));
    assert_eq!(fw.store().storage().occupied().as_slice(), &[31]);
}

#[test]
fn cycling_from_last_group_entry_wraps_to_first() {
    let mut fw = firmware(RamCells::holding(0, state(ModeId::Turbo, ModeId::Moon)));
    boot(&mut fw, SHORT_PRESS);
    assert_eq!(fw.light(Light::Primary).mode(), ModeId::Moon);

    fw.cycle(Light::Primary);
    assert_eq!(fw.light(Light::Primary).mode(), ModeId::Low);
}

#[test]
fn cycling_a_mode_outside_the_group_falls_back_to_first_entry() {
    // Turbo is not in the secondary group
    let mut fw = firmware(RamCells::holding(0, state(ModeId::Low, ModeId::Turbo)));

    boot(&mut fw, MEDIUM_PRESS);

    assert_eq!(fw.light(Light::Secondary).mode(), ModeId::Moon);
    assert_eq!(fw.light(Light::Primary).mode(), ModeId::Low);
}

#[test]
fn restored_out_of_group_mode_still_plays_until_cycled() {
    let mut fw = firmware(RamCells::holding(0, state(ModeId::Low, ModeId::Off)));

    boot(&mut fw, SHORT_PRESS);
    let report = fw.tick();

    assert_eq!(report.level(Light::Secondary), Some(0));
    assert_eq!(fw.light(Light::Secondary).mode(), ModeId::Off);
}

#[test]
fn undecodable_cell_behaves_like_empty_store() {
    let mut cells = RamCells::erased();
    cells.cells[12] = 0x0F;
    let mut fw = firmware(cells);

    boot(&mut fw, SHORT_PRESS);

    // Defaults, then primary cycled once; the bad cell is erased
    assert_eq!(fw.persisted(), state(ModeId::Low, ModeId::Moon));
    assert_eq!(fw.store().storage().cells[12], EMPTY_CELL);
    assert_eq!(fw.store().storage().occupied().as_slice(), &[13]);
}

#[test]
fn boot_disables_then_arms_timer_once() {
    let config = FirmwareConfig::DEFAULT.with_tick_ms(250).unwrap();
    let mut fw: TestFirmware =
        Firmware::new(&FLASHLIGHT, MockOutput::new(), RamCells::erased(), config);
    let mut sensor = MockSensor(COLD);
    let mut timer = MockTimer::new();

    fw.boot(&mut sensor, &mut timer);

    assert_eq!(timer.calls(), &[TimerCall::Disable, TimerCall::Enable(250)]);
    assert_eq!(fw.config().tick_ms.get(), 250);
    assert_eq!(fw.catalog().group(Light::Primary), FLASHLIGHT.group(Light::Primary));
}

#[test]
fn zero_tick_period_is_rejected_before_the_timer_is_armed() {
    assert_eq!(
        FirmwareConfig::DEFAULT.with_tick_ms(0),
        Err(ConfigError::ZeroTickPeriod)
    );
    assert_eq!(
        format!("{}", ConfigError::ZeroTickPeriod),
        "tick period must be at least 1 ms"
    );
}

#[test]
fn blink_keeps_blinking_at_a_one_millisecond_tick() {
    let config = FirmwareConfig::DEFAULT.with_tick_ms(1).unwrap();
    let mut fw: TestFirmware = Firmware::new(
        &FLASHLIGHT,
        MockOutput::new(),
        RamCells::holding(0, state(ModeId::Moon, ModeId::High)),
        config,
    );
    boot(&mut fw, MEDIUM_PRESS);
    assert_eq!(fw.light(Light::Secondary).mode(), ModeId::Blink);

    // 170 for 101 ticks, 0 for 401 ticks
    for _ in 0..503 {
        fw.tick();
    }

    assert_eq!(fw.output().levels_of(Light::Secondary).as_slice(), &[170, 0, 170]);
}

#[test]
fn boot_uses_configured_thresholds() {
    let config = FirmwareConfig::DEFAULT.with_thresholds(Thresholds {
        short: 0,
        medium: 0,
    });
    let mut fw: TestFirmware =
        Firmware::new(&FLASHLIGHT, MockOutput::new(), RamCells::erased(), config);

    assert_eq!(boot(&mut fw, 255), Command::ColdBoot);
}

#[test]
fn every_mode_change_is_saved_synchronously() {
    let mut fw = firmware(RamCells::erased());
    boot(&mut fw, COLD);

    for expected in [ModeId::Low, ModeId::Medium, ModeId::High] {
        fw.cycle(Light::Primary);
        let cursor = fw.store().cursor() as usize;
        assert_eq!(
            fw.store().storage().cells[cursor],
            state(expected, ModeId::Moon).encode()
        );
    }
}

#[test]
fn ticks_do_not_touch_storage_without_mode_change() {
    let mut fw = firmware(RamCells::erased());
    boot(&mut fw, COLD);
    let writes = fw.store().storage().writes().len();

    for _ in 0..100 {
        fw.tick();
    }

    assert_eq!(fw.store().storage().writes().len(), writes);
}

#[test]
fn turbo_timeout_persists_high_so_next_press_returns_to_turbo() {
    let mut fw = firmware(RamCells::holding(0, state(ModeId::High, ModeId::Moon)));
    boot(&mut fw, SHORT_PRESS);
    assert_eq!(fw.light(Light::Primary).mode(), ModeId::Turbo);

    // Turbo starts on tick 1 and stays at full power for 60 more ticks
    for _ in 0..61 {
        assert!(!fw.tick().mode_changed());
    }
    assert_eq!(fw.output().level(Light::Primary), Some(255));

    assert!(fw.tick().mode_changed());
    assert_eq!(fw.light(Light::Primary).mode(), ModeId::High);
    assert_eq!(fw.output().level(Light::Primary), Some(180));

    // Power cycle with a short tap
    let mut rebooted = firmware(RamCells::from_cells(fw.store().storage().cells));
    boot(&mut rebooted, SHORT_PRESS);
    assert_eq!(rebooted.light(Light::Primary).mode(), ModeId::Turbo);
}

#[test]
fn first_tick_after_cycle_emits_new_mode_immediately() {
    let mut fw = firmware(RamCells::holding(0, state(ModeId::Moon, ModeId::Medium)));
    boot(&mut fw, MEDIUM_PRESS);

    let report = fw.tick();

    assert_eq!(report.level(Light::Secondary), Some(180));
    assert_eq!(fw.output().levels_of(Light::Primary).as_slice(), &[3]);
}
