//! Driver behaviour against the simulated register file

use tm4c123x_ssi::reg::{Register, RegisterFile};
use tm4c123x_ssi::sim::SimRegisters;
use tm4c123x_ssi::ssi::config::{Config, FrameFormat, SSE};
use tm4c123x_ssi::ssi::{Error, Mode, Phase, Polarity, Ssi};
use tm4c123x_ssi::sysctl::Clocks;
use tm4c123x_ssi::time::rate::Hertz;
use tm4c123x_ssi::wait::BoundedSpin;

fn init(sim: &SimRegisters) -> Ssi<&SimRegisters> {
    Ssi::new(sim, Config::default(), Clocks::default())
}

const SSI_REGISTERS: [Register; 4] = [Register::Cr0, Register::Cr1, Register::Cpsr, Register::Cc];

#[test]
fn configuration_after_init() {
    let sim = SimRegisters::new();
    init(&sim);

    let cr1 = sim.peek(Register::Cr1);
    assert_eq!(cr1 & 0b010, 0b010, "controller enabled");
    assert_eq!(cr1 & 0b001, 0, "loopback disabled");
    assert_eq!(cr1 & 0b100, 0, "master mode");

    assert_eq!(sim.peek(Register::Cpsr), 50);
    assert_eq!(sim.peek(Register::Cc) & 0xF, 0x0);

    let cr0 = sim.peek(Register::Cr0);
    assert_eq!(cr0 & 0xFF00, 0, "SCR");
    assert_eq!(cr0 & 0x0080, 0, "SPH");
    assert_eq!(cr0 & 0x0040, 0, "SPO");
    assert_eq!(cr0 & 0x0030, 0, "FRF");
    assert_eq!(cr0 & 0x000F, 0x7, "DSS");

    assert_eq!(sim.peek(Register::Rcgcssi) & 1, 1);
    assert_eq!(sim.peek(Register::Rcgcgpio) & 1, 1);
    assert_eq!(sim.peek(Register::GpioaAfsel), 0x3C);
    assert_eq!(sim.peek(Register::GpioaPctl), 0x0022_2200);
    assert_eq!(sim.peek(Register::GpioaDen), 0x3C);
}

#[test]
fn init_overrides_leftover_configuration() {
    let sim = SimRegisters::new();
    // a previous user left the controller in slave mode, loopback, 16 bit,
    // TI frames, mode 3 and a slow clock
    sim.write(Register::Cr1, 0b111);
    sim.write(Register::Cr0, 0xFFFF);
    sim.write(Register::Cc, 0x5);
    sim.write(Register::Cpsr, 0xFE);

    init(&sim);

    assert_eq!(sim.peek(Register::Cr1), 0b010);
    assert_eq!(sim.peek(Register::Cr0), 0x0007);
    assert_eq!(sim.peek(Register::Cc), 0x0);
    assert_eq!(sim.peek(Register::Cpsr), 50);
}

#[test]
fn init_is_idempotent() {
    let once = SimRegisters::new();
    init(&once);

    let many = SimRegisters::new();
    for _ in 0..5 {
        init(&many);
    }

    assert_eq!(once.snapshot(), many.snapshot());
}

#[test]
fn init_order() {
    let sim = SimRegisters::new();
    init(&sim);

    let writes: Vec<_> = sim.writes().collect();
    let first_ssi = writes
        .iter()
        .position(|w| SSI_REGISTERS.contains(&w.register))
        .unwrap();

    // clocks and pins come first
    for w in &writes[..first_ssi] {
        assert!(
            matches!(
                w.register,
                Register::Rcgcssi
                    | Register::Rcgcgpio
                    | Register::GpioaAfsel
                    | Register::GpioaPctl
                    | Register::GpioaDen
            ),
            "{:?} written before the controller",
            w.register
        );
    }

    // the first controller write disables it
    let disable = &writes[first_ssi];
    assert_eq!(disable.register, Register::Cr1);
    assert_eq!(SSE.extract(disable.value), 0);

    // it stays disabled until the last write, which enables it
    let (last, config) = writes[first_ssi + 1..].split_last().unwrap();
    for w in config {
        assert!(SSI_REGISTERS.contains(&w.register));
        if w.register == Register::Cr1 {
            assert_eq!(SSE.extract(w.value), 0);
        }
    }
    assert_eq!(last.register, Register::Cr1);
    assert_eq!(SSE.extract(last.value), 1);
    assert!(config.iter().any(|w| w.register == Register::Cpsr));
    assert!(config.iter().any(|w| w.register == Register::Cc));
}

#[test]
fn send_waits_for_an_empty_transmit_fifo() {
    let sim = SimRegisters::new();
    let mut ssi = init(&sim);
    let before = sim.snapshot();
    sim.clear_log();
    sim.tx_ready_after(10);
    let polls = sim.status_polls();

    ssi.send(0xAA);

    let writes: Vec<_> = sim.writes().collect();
    assert_eq!(writes.len(), 1, "only the data register is written");
    assert_eq!(writes[0].register, Register::Dr);
    assert_eq!(writes[0].value, 0xAA);
    // ten unsuccessful polls, the eleventh saw the flag
    assert_eq!(writes[0].status_polls - polls, 11);

    let after = sim.snapshot();
    for reg in SSI_REGISTERS.iter() {
        assert_eq!(before[reg.index()], after[reg.index()]);
    }
    assert_eq!(sim.transmitted(), Some(0xAA));
}

#[test]
fn read_waits_for_received_data() {
    let sim = SimRegisters::new();
    let mut ssi = init(&sim);
    sim.rx_after(7, 0xF1A5);
    let polls = sim.status_polls();

    assert_eq!(ssi.read(), 0xA5);
    assert_eq!(sim.status_polls() - polls, 8);
    assert!(!sim.rx_pending());
}

#[test]
fn mosi_scenario() {
    let sim = SimRegisters::new();
    let mut ssi = init(&sim);

    for _ in 0..3 {
        ssi.send(0xAA);
        assert_eq!(sim.transmitted(), Some(0xAA));
        assert_eq!(SSE.extract(sim.peek(Register::Cr1)), 1);
    }
    assert!(sim
        .writes()
        .filter(|w| w.register == Register::Cr1)
        .all(|w| w.status_polls == 0));
}

#[test]
fn external_loopback_scenario() {
    let sim = SimRegisters::new().with_external_loopback();
    let mut ssi = init(&sim);

    ssi.send(0x5C);
    assert_eq!(ssi.read(), 0x5C);
}

#[test]
fn external_loopback_round_trips_every_byte() {
    let sim = SimRegisters::new().with_external_loopback();
    let mut ssi = init(&sim);

    for v in 0..=u8::MAX {
        assert_eq!(ssi.transfer(v), v);
    }
}

#[test]
fn without_wiring_nothing_is_received() {
    let sim = SimRegisters::new();
    let mut ssi = init(&sim).with_wait(BoundedSpin::new(1_000));

    assert_eq!(ssi.try_send(0x5C), Ok(()));
    assert_eq!(ssi.try_read(), Err(Error::Timeout));
    assert_eq!(ssi.try_transfer(0x5C), Err(Error::Timeout));
}

#[test]
fn bounded_send_does_not_write_on_timeout() {
    let sim = SimRegisters::new();
    let mut ssi = init(&sim).with_wait(BoundedSpin::new(16));
    sim.set_tx_empty(false);
    sim.clear_log();

    assert_eq!(ssi.try_send(0x42), Err(Error::Timeout));
    assert_eq!(sim.writes().count(), 0);
    assert_eq!(sim.transmitted(), None);

    // the bus recovers, the same driver keeps working
    sim.set_tx_empty(true);
    assert_eq!(ssi.try_send(0x42), Ok(()));
    assert_eq!(sim.transmitted(), Some(0x42));
}

#[test]
fn custom_configuration() {
    let sim = SimRegisters::new();
    let config = Config::default()
        .frequency(Hertz(100_000))
        .mode(Mode {
            polarity: Polarity::IdleHigh,
            phase: Phase::CaptureOnSecondTransition,
        })
        .frame_format(FrameFormat::Microwire);
    let ssi: Ssi<_> = Ssi::new(&sim, config, Clocks::default());

    let cr0 = sim.peek(Register::Cr0);
    assert_eq!(cr0 >> 8, 1, "SCR");
    assert_eq!(cr0 & 0x00C0, 0x00C0, "SPH and SPO");
    assert_eq!(cr0 & 0x0030, 0x0020, "FRF");
    assert_eq!(sim.peek(Register::Cpsr), 250);
    assert_eq!(ssi.frequency().0, 100_000);
}

#[test]
fn internal_loopback_mode() {
    let sim = SimRegisters::new();
    let mut ssi: Ssi<_> = Ssi::new(&sim, Config::default().loopback(true), Clocks::default());

    assert_eq!(sim.peek(Register::Cr1), 0b011);
    assert_eq!(ssi.transfer(0x81), 0x81);
}
