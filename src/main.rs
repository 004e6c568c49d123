//! Wave Bubble Main Application
//!
//! Entry point for the STM32G474-based firmware. A high-priority
//! interrupt executor runs the 1 ms tick; the foreground loop runs
//! blocking on the main stack and is preempted by it.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::{error, info, unwrap};
use embassy_executor::InterruptExecutor;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::flash::Flash;
use embassy_stm32::gpio::{Flex, Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::time::khz;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use wavebubble::app::{hold_to_power_on, Jammer, Status};
use wavebubble::board::{BoardAdc, FlashStore, PageBuffer, SweepPin, TuningPwm};
use wavebubble::config::{flash, CONSOLE_BAUD, MENU_WINDOW_MS, PWM_MAX_DUTY, TICK_PERIOD_MS};
use wavebubble::console::{Console, MenuExit};
use wavebubble::drivers::ad8402::Ad8402;
use wavebubble::drivers::lmx2433::Lmx2433;
use wavebubble::hal::gpio::{LockDetectPins, ProgramKey, StatusLed, VcoPowerPins};
use wavebubble::hal::pwm::TuningVoltage;
use wavebubble::hal::timer::{Counters, SystemTimers, TimerService};
use wavebubble::power::PowerHold;
use wavebubble::store::ProgramStore;
use wavebubble::tuning::{Frontend, RfFrontend};

bind_interrupts!(struct Irqs {
    USART1 => usart::BufferedInterruptHandler<peripherals::USART1>;
});

static COUNTERS: Counters = Counters::new();
static EXECUTOR_TICK: InterruptExecutor = InterruptExecutor::new();

static PAGE_BUFFER: StaticCell<PageBuffer> = StaticCell::new();
static UART_TX: StaticCell<[u8; 256]> = StaticCell::new();
static UART_RX: StaticCell<[u8; 64]> = StaticCell::new();

#[interrupt]
unsafe fn UART4() {
    EXECUTOR_TICK.on_interrupt();
}

/// 1 ms system tick
#[embassy_executor::task]
async fn tick_task(counters: &'static Counters) {
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(TICK_PERIOD_MS)));
    loop {
        ticker.next().await;
        counters.tick();
    }
}

/// Main entry point
#[entry]
fn main() -> ! {
    info!("Wave Bubble Firmware v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    // Tick first: every wait below depends on it
    interrupt::UART4.set_priority(Priority::P6);
    let spawner = EXECUTOR_TICK.start(interrupt::UART4);
    unwrap!(spawner.spawn(tick_task(&COUNTERS)));
    let timers = SystemTimers::new(&COUNTERS);

    let mut key = ProgramKey::new(Input::new(p.PB8, Pull::Up));
    let mut hold = PowerHold::new(Output::new(p.PB9, Level::Low, Speed::Low));
    if !hold_to_power_on(&timers, &mut key) {
        info!("key released before power-on");
        loop {
            timers.idle();
        }
    }
    hold.latch();

    let mut led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));
    led.on();

    let uart_config = {
        let mut config = usart::Config::default();
        config.baudrate = CONSOLE_BAUD;
        config
    };
    let uart = unwrap!(BufferedUart::new(
        p.USART1,
        Irqs,
        p.PB7,
        p.PB6,
        UART_TX.init([0; 256]),
        UART_RX.init([0; 64]),
        uart_config,
    ));
    let mut console = Console::new(uart);

    let synth = Lmx2433::new(
        Output::new(p.PB3, Level::Low, Speed::VeryHigh),
        Output::new(p.PB4, Level::Low, Speed::VeryHigh),
        Output::new(p.PB5, Level::Low, Speed::VeryHigh),
        Delay,
    );
    let pot = unwrap!(Ad8402::new(
        Output::new(p.PC0, Level::Low, Speed::VeryHigh),
        Output::new(p.PC1, Level::Low, Speed::VeryHigh),
        Output::new(p.PC2, Level::High, Speed::VeryHigh),
        Delay,
    ));

    let pwm = SimplePwm::new(
        p.TIM1,
        Some(PwmPin::new_ch1(p.PA8, OutputType::PushPull)),
        Some(PwmPin::new_ch2(p.PA9, OutputType::PushPull)),
        None,
        None,
        khz(20),
        CountingMode::EdgeAlignedUp,
    );
    let adc = BoardAdc::new(
        Adc::new(p.ADC1),
        p.PA0.degrade_adc(),
        p.PA1.degrade_adc(),
        p.PB0.degrade_adc(),
    );

    let mut frontend = RfFrontend {
        synth,
        pot,
        tuning: TuningVoltage::new(TuningPwm::new(pwm, PWM_MAX_DUTY), PWM_MAX_DUTY),
        lock: LockDetectPins::new(Input::new(p.PC3, Pull::Down), Input::new(p.PC4, Pull::Down)),
        adc,
        power: VcoPowerPins::new(
            Output::new(p.PC5, Level::Low, Speed::Low),
            Output::new(p.PC6, Level::Low, Speed::Low),
        ),
        sweep: SweepPin::new(Flex::new(p.PC7)),
        timers,
    };
    if frontend.init().is_err() {
        error!("RF front end init failed");
    }

    let storage = FlashStore::new(Flash::new_blocking(p.FLASH), PAGE_BUFFER.init([0; flash::PAGE_SIZE]));
    let mut store = unwrap!(ProgramStore::open(storage).ok());
    info!("{} programs stored", store.count());

    // Menu on request, or when there is nothing to run
    if store.count() > 0 {
        let _ = console.print("Press key to enter menu...");
        timers.delay_ms(MENU_WINDOW_MS);
    }
    loop {
        let wants_menu = console.poll_for_menu().unwrap_or(false);
        if !wants_menu && store.count() > 0 {
            break;
        }
        match console.run_menu(&mut store, &mut frontend) {
            Ok(MenuExit::Quit) => {}
            Ok(MenuExit::PowerOff) => {
                frontend.power_down();
                hold.power_off(&timers);
                loop {
                    timers.idle();
                }
            }
            Err(_) => error!("console failed"),
        }
        if store.count() == 0 {
            let _ = console.print("No programs stored.\n");
        }
    }

    let mut jammer = Jammer::new(frontend, store, led, key, hold);
    match jammer.activate() {
        Ok(Some(program)) => {
            let (store, _) = jammer.parts();
            let count = store.count();
            let _ = console.print_program(&program, jammer.active(), count);
        }
        Ok(None) => {}
        Err(_) => error!("program activation failed"),
    }

    loop {
        match jammer.service() {
            Ok(Status::Running) => {}
            Ok(Status::Halted) => break,
            Err(_) => error!("program switch failed"),
        }
    }
    loop {
        timers.idle();
    }
}
