#![no_std]
#![no_main]

use btpad::{ConnectionSupervisor, Decoder, InputEvent, PadState};
use btpad_rp2040::{
    configure_usb_hid, ChannelSink, EventChannel, PadRequestHandler, UartByteSource, UsbDriver,
    UsbHidOutput, EVENT_QUEUE_DEPTH, MODULE_BAUDRATE,
};
use defmt::{error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART1, USB};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Timer};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Driver selected at build time, e.g. `BTPAD_DRIVER=gamestop`.
///
/// Only stream drivers work here; the UART carries no HID packet boundaries.
const DRIVER: &str = match option_env!("BTPAD_DRIVER") {
    Some(name) => name,
    None => "zeemote",
};

/// Pause before reopening a connection the supervisor gave up on.
const RECONNECT_DELAY_MS: u64 = 2_000;

static EVENTS: StaticCell<EventChannel> = StaticCell::new();

/// Raised when the connection drops so the pad releases everything.
static PAD_RESET: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

static HID_STATE: StaticCell<State> = StaticCell::new();
static HID_HANDLER: StaticCell<PadRequestHandler> = StaticCell::new();

type EventSender = Sender<'static, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>;
type EventReceiver = Receiver<'static, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("btpad starting, driver {}", DRIVER);

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let events = EVENTS.init(EventChannel::new());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = MODULE_BAUDRATE;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (_tx, rx) = uart.split();
    let source = UartByteSource::new(rx);

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("btpad");
    usb_config.product = Some("Bluetooth Gamepad Bridge");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
    );

    let hid_writer = configure_usb_hid(
        &mut builder,
        HID_STATE.init(State::new()),
        HID_HANDLER.init(PadRequestHandler),
    );
    let usb_device = builder.build();
    let usb_output = UsbHidOutput::new(hid_writer);

    // On-board LED, lit while disconnected
    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(link_task(source, events.sender(), led).unwrap());
    spawner.spawn(output_task(usb_output, events.receiver()).unwrap());
}

#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, UsbDriver<'static>>) {
    device.run().await;
}

/// Decodes the controller stream, reconnecting after the supervisor gives up.
#[embassy_executor::task]
async fn link_task(source: UartByteSource<'static>, sender: EventSender, mut led: Output<'static>) {
    let decoder = match Decoder::from_driver_name(DRIVER) {
        Ok(decoder) => decoder,
        Err(e) => {
            error!("{}: {}", DRIVER, e);
            led.set_high();
            return;
        }
    };
    let transport = decoder.transport();
    if !transport.is_stream() {
        error!("{} needs a {:?} link, not a serial stream", DRIVER, transport);
        led.set_high();
        return;
    }
    info!("decoding {} over {:?}", DRIVER, transport);

    let mut supervisor =
        ConnectionSupervisor::new(source, decoder, ChannelSink::new(sender), Delay);
    loop {
        led.set_low();
        let err = supervisor.run().await;
        error!("connection dropped: {:?}", err);

        led.set_high();
        PAD_RESET.signal(());
        let dropped = supervisor.sink().dropped();
        if dropped > 0 {
            warn!("{} events dropped so far", dropped);
        }

        Timer::after_millis(RECONNECT_DELAY_MS).await;
        supervisor.reconnect();
    }
}

/// Folds events into the pad and reports changes over USB.
#[embassy_executor::task]
async fn output_task(mut output: UsbHidOutput<'static>, receiver: EventReceiver) {
    output.wait_ready().await;
    info!("USB HID ready");

    let mut pad = PadState::neutral();
    loop {
        match select(receiver.receive(), PAD_RESET.wait()).await {
            Either::First(event) => {
                if !pad.apply(&event) {
                    continue;
                }
            }
            Either::Second(()) => pad = PadState::neutral(),
        }
        if let Err(e) = output.send(&pad).await {
            error!("Output error: {:?}", e);
        }
    }
}
