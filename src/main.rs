use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use avatar_view::config::ViewConfig;
use avatar_view::model::{CharacterAttributes, CharacterModel, ExpTable};
use avatar_view::ui::{
    AvatarView, AvatarWidgets, Canvas, DirTextureLoader, PointerEvent, RectTransform,
    TemplateFactory, UiCamera,
};
use clap::Parser;
use glam::Vec2;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Character file (RON); a built-in sample is used when omitted
    #[arg(long)]
    character: Option<PathBuf>,

    /// Experience to add after binding
    #[arg(long, default_value_t = 0)]
    gain_exp: i32,

    /// Force a level after binding
    #[arg(long)]
    set_level: Option<i32>,

    /// Simulate hovering the portrait and print the tooltip
    #[arg(long)]
    hover: bool,
}

fn sample_character() -> CharacterAttributes {
    CharacterAttributes {
        name: String::from("Lyra"),
        avatar: String::from("lyra"),
        level: 2,
        attack: 17,
        defense: 9,
        move_speed: 5.5,
        force_power: 3.9,
        agile_power: 7.25,
        intelligence_power: 12.0,
        exp: 150,
        exp_table: ExpTable::new(vec![0, 100, 300, 600, 1000, 1500]),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ViewConfig::load()?;

    let default_filter = if config.debug.verbose_logging { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let attributes = match &args.character {
        Some(path) => CharacterAttributes::load(path)
            .with_context(|| format!("Failed to load character {:?}", path))?,
        None => sample_character(),
    };
    log::info!("Binding portrait to {}", attributes.name);
    let hero = Rc::new(RefCell::new(CharacterModel::new(attributes)));

    let viewport = Vec2::new(config.ui.viewport_width as f32, config.ui.viewport_height as f32);
    let camera = UiCamera::screen_space(viewport);
    let canvas = Canvas::overlay(&camera);
    let panel = Vec2::new(config.ui.panel_width, config.ui.panel_height);
    // top-left corner of the screen, 10px margin
    let rect = RectTransform::new(
        Vec2::new(10.0 + panel.x * 0.5, viewport.y - 10.0 - panel.y * 0.5),
        panel,
    );

    let loader = DirTextureLoader::new(&config.resources.root, config.resources.avatar_dir.clone());
    let mut view = AvatarView::new(
        AvatarWidgets::complete(rect, config.exp_bar.width),
        canvas,
        camera,
        Box::new(TemplateFactory::default()),
        &config,
    )
    .with_textures(Rc::new(loader));

    if let Err(e) = view.init(&hero) {
        log::warn!("Initial refresh incomplete: {}", e);
    }

    if let Some(level) = args.set_level {
        hero.borrow_mut().set_level(level);
    }
    if args.gain_exp != 0 {
        let gained = hero.borrow_mut().gain_exp(args.gain_exp);
        if gained > 0 {
            log::info!("Gained {} level(s)", gained);
        }
    }

    let snap = view.snapshot();
    println!("{} (Lv. {})", snap.name, snap.level);
    println!("  ATK {}  DEF {}  SPD {}", snap.attack, snap.defense, snap.move_speed);
    println!(
        "  STR {}  AGI {}  INT {}",
        snap.force_power, snap.agile_power, snap.intelligence_power
    );
    println!("  {} (bar height {})", snap.exp, snap.exp_fill);
    match &snap.avatar {
        Some(name) => println!("  avatar: {}", name),
        None => println!("  avatar: <none>"),
    }

    if args.hover {
        view.handle_pointer(PointerEvent::Enter)?;
        if let Some(tips) = view.tooltip().tooltip() {
            let pos = tips.anchored_position();
            println!("Tooltip at ({:.1}, {:.1}): {}", pos.x, pos.y, tips.title());
            for line in tips.lines() {
                println!("  {:<12} {}", line.label, line.value);
            }
        }
        view.handle_pointer(PointerEvent::Exit)?;
    }

    Ok(())
}
