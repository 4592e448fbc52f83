#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_net::{Runner, StackResources};
use embassy_time::{Instant, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::wifi::WifiDevice;
use log::info;
use static_cell::{ConstStaticCell, StaticCell};

// Display-LCD panel specific imports
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use mipidsi::interface::SpiInterface;
use mipidsi::{Builder as MipidsiBuilder, models::GC9107};

use notice_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use notice_core::{Controller, FramePresenter, WifiState, WifiSupervisor};
use notice_firmware::button::Button;
use notice_firmware::clock::EmbassyClock;
use notice_firmware::config;
use notice_firmware::webhook::{HttpBuffers, WebhookClient, WebhookTcpState};
use notice_firmware::wifi_link::EspWifiLink;

/// The GC9107 controller addresses 128x160; the AtomS3 glass starts at row 32
const PANEL_ROW_OFFSET: u16 = 32;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);
    // Framebuffer plus WiFi driver buffers
    esp_alloc::heap_allocator!(size: 96 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    let device_config = config::load().expect("Invalid configuration in .env");
    let timings = device_config.timings;

    static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    let radio = RADIO.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));
    let (wifi_controller, interfaces) =
        esp_radio::wifi::new(radio, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi controller");

    let rng = Rng::new();
    let seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());

    static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(net_task(runner)).ok();

    // Configure and initialize the display

    // 1. Configure SPI bus
    let spi_bus = Spi::new(peripherals.SPI2, SpiConfig::default())
        .expect("Failed to configure SPI")
        .with_sck(peripherals.GPIO17)
        .with_mosi(peripherals.GPIO21);

    // 2. Chip select
    let cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());

    // 3. Wrap the SPI bus as a SPI device (required by embedded-hal traits)
    let spi_device =
        ExclusiveDevice::new_no_delay(spi_bus, cs).expect("Failed to create SPI device");

    // 4. Data/Command and reset pins
    let dc = Output::new(peripherals.GPIO33, Level::Low, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO34, Level::High, OutputConfig::default());

    // 5. Buffer for SPI batching
    let mut spi_buffer = [0u8; 512];

    // 6. Create display interface
    let di = SpiInterface::new(spi_device, dc, &mut spi_buffer);

    // 7. Build and initialize the display driver
    let display = MipidsiBuilder::new(GC9107, di)
        .reset_pin(rst)
        .display_size(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)
        .display_offset(0, PANEL_ROW_OFFSET)
        .init(&mut embassy_time::Delay)
        .expect("Failed to initialize display");

    // 8. Backlight on
    let _backlight = Output::new(peripherals.GPIO16, Level::High, OutputConfig::default());

    info!("Display initialized!");

    let mut presenter = FramePresenter::new(display);

    let button_input = Input::new(
        peripherals.GPIO41,
        InputConfig::default().with_pull(Pull::Up),
    );
    let mut button = Button::new(button_input, timings.debounce);

    // Never proceed without WiFi
    let mut link = EspWifiLink::new(wifi_controller);
    let mut supervisor = WifiSupervisor::new(device_config.internet.clone(), timings);
    loop {
        if let WifiState::Connected { .. } =
            supervisor.poll(Instant::now(), &mut link, &mut presenter)
        {
            break;
        }
        Timer::after(timings.poll_interval).await;
    }
    let ssid = supervisor.connected_network().map(|n| n.ssid).unwrap_or("");

    Timer::after(timings.wifi_connected_dwell).await;
    stack.wait_config_up().await;
    if let Some(ip) = stack.config_v4() {
        info!("IP address: {}", ip.address);
    }

    static TCP_STATE: ConstStaticCell<WebhookTcpState> =
        ConstStaticCell::new(WebhookTcpState::new());
    static HTTP_BUFFERS: ConstStaticCell<HttpBuffers> = ConstStaticCell::new(HttpBuffers::new());
    let network = WebhookClient::new(
        link,
        ssid,
        stack,
        TCP_STATE.take(),
        HTTP_BUFFERS.take(),
        device_config.webhooks,
    );

    let mut controller = Controller::new(
        timings,
        network,
        presenter,
        EmbassyClock,
        embassy_time::Delay,
    );
    controller.start();

    loop {
        let edge = button.poll(Instant::now());
        controller.tick(edge).await;
        Timer::after(timings.poll_interval).await;
    }
}
