mod app;
mod buffer;
mod data;
mod features;
mod paths;
mod render;
mod settings;
mod terminal;
mod text;

use std::fs::{self, File};
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use log::{error, info, warn};
use simplelog::{Config, WriteLogger};

use editgrid_lib::GridOptions;
use editgrid_lib::model::Dataset;
use editgrid_lib::section::Section;

use crate::app::App;
use crate::settings::Settings;
use crate::terminal::Terminal;

/// Frame interval while idle.
const TICK: Duration = Duration::from_millis(100);

const CHECKBOX_WIDTH: u16 = 4;

fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    WriteLogger::init(settings.level_filter()?, Config::default(), File::create(path)?)?;
    Ok(())
}

fn build_sections(settings: &Settings) -> Result<Vec<Section>, editgrid_lib::error::DatasetError> {
    let mut rng = rand::rng();
    let options = GridOptions::default()
        .row_height(1)
        .overscan(settings.overscan)
        .checkbox_width(CHECKBOX_WIDTH);

    let people = Dataset::new(data::make_people(settings.people_rows, &mut rng))?;
    let products = Dataset::new(data::make_products(settings.product_rows, &mut rng))?;
    let catalog = Dataset::new(data::make_data(settings.catalog_rows, &mut rng))?;
    info!(
        "Generated {} people, {} products, {} catalog rows",
        people.len(),
        products.len(),
        catalog.len()
    );

    let people = Section::with_options(
        "People",
        people,
        features::people::columns(),
        options.clone(),
    )
    .with_style_hook(features::people::style_cell);
    let products = Section::with_options(
        "Products",
        products,
        features::products::columns(),
        options.clone(),
    )
    .with_style_hook(features::products::style_cell);
    let catalog = Section::read_only_with_options(
        "Catalog",
        catalog,
        features::catalog::columns(),
        options,
    );

    Ok(vec![people, products, catalog])
}

fn run(app: &mut App) -> io::Result<()> {
    let mut terminal = Terminal::new()?;
    while !app.should_quit() {
        terminal.draw(|buf| render::render(app, buf))?;
        for event in terminal.poll(TICK)? {
            app.handle_event(event);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let settings_path = paths::settings_file();
    let settings = match settings_path.as_deref().map(Settings::load) {
        Some(Ok(settings)) => settings,
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
        None => Settings::default(),
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("Error: failed to initialize logger: {}", e);
        return ExitCode::FAILURE;
    }

    // First run: write the defaults out.
    if let Some(path) = settings_path.filter(|p| !p.exists()) {
        match settings.save(&path) {
            Ok(()) => info!("Wrote default settings to {}", path.display()),
            Err(e) => warn!("Could not write {}: {}", path.display(), e),
        }
    }

    let sections = match build_sections(&settings) {
        Ok(sections) => sections,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(sections);
    if let Err(e) = run(&mut app) {
        error!("Terminal error: {}", e);
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    info!("Bye");
    ExitCode::SUCCESS
}
