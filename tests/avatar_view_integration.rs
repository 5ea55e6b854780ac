//! End-to-end tests: character model -> portrait panel -> tooltip

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use avatar_view::config::ViewConfig;
use avatar_view::model::{Attribute, CharacterAttributes, CharacterModel, ExpTable};
use avatar_view::ui::{
    AvatarView, AvatarWidgets, Canvas, CharacterAttributeTips, DirTextureLoader, PointerEvent,
    RectTransform, TemplateFactory, TooltipPhase, UiCamera,
};
use avatar_view::ViewError;
use glam::Vec2;

// ============================================================================
// Helpers
// ============================================================================

fn hero(attrs: CharacterAttributes) -> Rc<RefCell<CharacterModel>> {
    Rc::new(RefCell::new(CharacterModel::new(attrs)))
}

fn view_at(position: Vec2, width: f32) -> AvatarView {
    let camera = UiCamera::screen_space(Vec2::new(1280.0, 720.0));
    let canvas = Canvas::overlay(&camera);
    AvatarView::new(
        AvatarWidgets::complete(RectTransform::new(position, Vec2::new(width, 100.0)), 20.0),
        canvas,
        camera,
        Box::new(TemplateFactory::default()),
        &ViewConfig::default(),
    )
}

fn write_png(dir: &Path, name: &str) {
    std::fs::create_dir_all(dir).unwrap();
    image::RgbaImage::from_pixel(8, 8, image::Rgba([10, 120, 200, 255]))
        .save(dir.join(format!("{name}.png")))
        .unwrap();
}

// ============================================================================
// Experience bar
// ============================================================================

#[test]
fn test_exp_bar_mid_level() {
    let h = hero(CharacterAttributes {
        level: 2,
        exp: 150,
        exp_table: ExpTable::new(vec![0, 100, 300]),
        ..Default::default()
    });
    let mut view = view_at(Vec2::new(200.0, 600.0), 240.0);
    view.init(&h).unwrap();

    let snap = view.snapshot();
    assert_eq!(snap.exp, "EXP: 25%");
    assert_eq!(snap.exp_fill, 25.0);
}

#[test]
fn test_exp_bar_level_zero() {
    let h = hero(CharacterAttributes {
        level: 0,
        exp: 40,
        exp_table: ExpTable::new(vec![0, 100, 300]),
        ..Default::default()
    });
    assert_eq!(h.borrow().attributes().next_level_need_exp().unwrap(), 100);

    let mut view = view_at(Vec2::new(200.0, 600.0), 240.0);
    view.init(&h).unwrap();
    assert_eq!(view.snapshot().exp, "EXP: 40%");

    // level 0 keeps tracking while the character stays there
    h.borrow_mut().set_exp(60);
    assert_eq!(view.snapshot().exp, "EXP: 60%");
    assert_eq!(view.snapshot().exp_fill, 60.0);
}

#[test]
fn test_exp_bar_clamps_overflow() {
    let h = hero(CharacterAttributes {
        level: 1,
        exp: 50,
        exp_table: ExpTable::new(vec![0, 100]),
        ..Default::default()
    });
    let mut view = view_at(Vec2::ZERO, 100.0);
    view.init(&h).unwrap();

    // set_exp does not level up, so the bar saturates
    h.borrow_mut().set_exp(9_999);
    assert_eq!(view.snapshot().exp, "EXP: 100%");
    assert_eq!(view.snapshot().exp_fill, 100.0);
}

#[test]
fn test_gain_exp_updates_level_and_bar() {
    let h = hero(CharacterAttributes {
        level: 0,
        exp: 0,
        exp_table: ExpTable::new(vec![0, 100, 300, 600]),
        ..Default::default()
    });
    let mut view = view_at(Vec2::ZERO, 100.0);
    view.init(&h).unwrap();

    h.borrow_mut().gain_exp(40);
    assert_eq!(view.snapshot().level, "0");
    assert_eq!(view.snapshot().exp, "EXP: 40%");

    // crossing 100 leaves level 0 and level 1, which share that bound
    assert_eq!(h.borrow_mut().gain_exp(160), 2);
    let snap = view.snapshot();
    assert_eq!(snap.level, "2");
    // (200 - 100) / (300 - 100)
    assert_eq!(snap.exp, "EXP: 50%");
}

// ============================================================================
// Refresh and bindings
// ============================================================================

#[test]
fn test_refresh_matches_model_and_is_idempotent() {
    let h = hero(CharacterAttributes {
        name: String::from("Bram"),
        level: 3,
        attack: 40,
        defense: 22,
        move_speed: 4.0,
        force_power: 18.6,
        agile_power: 9.999,
        intelligence_power: 3.9,
        exp: 700,
        exp_table: ExpTable::new(vec![100, 300, 600, 1000]),
        ..Default::default()
    });
    let mut view = view_at(Vec2::ZERO, 100.0);
    view.init(&h).unwrap();

    let first = view.snapshot();
    assert_eq!(first.name, "Bram");
    assert_eq!(first.level, "3");
    assert_eq!(first.attack, "40");
    assert_eq!(first.defense, "22");
    assert_eq!(first.move_speed, "4");
    assert_eq!(first.force_power, "18");
    assert_eq!(first.agile_power, "9");
    assert_eq!(first.intelligence_power, "3");
    assert_eq!(first.exp, "EXP: 25%");

    view.refresh().unwrap();
    view.refresh().unwrap();
    assert_eq!(view.snapshot(), first);
}

#[test]
fn test_dropping_view_releases_handlers() {
    let h = hero(CharacterAttributes {
        exp_table: ExpTable::new(vec![0, 100]),
        ..Default::default()
    });
    {
        let mut view = view_at(Vec2::ZERO, 100.0);
        view.init(&h).unwrap();
        for attr in [
            Attribute::Exp,
            Attribute::Level,
            Attribute::ForcePower,
            Attribute::AgilePower,
            Attribute::IntelligencePower,
        ] {
            assert_eq!(h.borrow().handler_count(attr), 1, "{attr:?}");
        }
        assert_eq!(h.borrow().handler_count(Attribute::Attack), 0);
    }
    assert_eq!(h.borrow().handler_count(Attribute::Exp), 0);

    // model still works without any view
    h.borrow_mut().set_exp(50);
    assert_eq!(h.borrow().exp(), 50);
}

// ============================================================================
// Avatar image
// ============================================================================

#[test]
fn test_avatar_loaded_on_refresh_and_change() {
    let tmp = tempfile::tempdir().unwrap();
    write_png(&tmp.path().join("UIImage"), "lyra");
    write_png(&tmp.path().join("UIImage"), "lyra_hooded");

    let h = hero(CharacterAttributes {
        avatar: String::from("lyra"),
        exp_table: ExpTable::new(vec![0, 100]),
        ..Default::default()
    });
    let mut view = view_at(Vec2::ZERO, 100.0)
        .with_textures(Rc::new(DirTextureLoader::new(tmp.path(), "UIImage")));
    view.init(&h).unwrap();
    assert_eq!(view.snapshot().avatar.as_deref(), Some("lyra"));

    h.borrow_mut().set_avatar("lyra_hooded");
    assert_eq!(view.snapshot().avatar.as_deref(), Some("lyra_hooded"));

    // a missing image leaves the previous texture in place
    h.borrow_mut().set_avatar("nobody");
    assert_eq!(view.snapshot().avatar.as_deref(), Some("lyra_hooded"));
}

#[test]
fn test_missing_avatar_reported_by_refresh() {
    let tmp = tempfile::tempdir().unwrap();
    let h = hero(CharacterAttributes {
        name: String::from("Ghost"),
        avatar: String::from("ghost"),
        exp_table: ExpTable::new(vec![0, 100]),
        ..Default::default()
    });
    let mut view = view_at(Vec2::ZERO, 100.0)
        .with_textures(Rc::new(DirTextureLoader::new(tmp.path(), "UIImage")));

    assert!(matches!(view.init(&h), Err(ViewError::TextureNotFound(_))));
    assert_eq!(view.snapshot().name, "Ghost");
    assert_eq!(view.snapshot().exp, "EXP: 0%");
}

// ============================================================================
// Tooltip
// ============================================================================

#[test]
fn test_tooltip_lifecycle() {
    let h = hero(CharacterAttributes {
        name: String::from("Lyra"),
        level: 1,
        exp: 120,
        exp_table: ExpTable::new(vec![100, 300]),
        ..Default::default()
    });
    let created = Rc::new(Cell::new(0));
    let counter = created.clone();

    let camera = UiCamera::screen_space(Vec2::new(1280.0, 720.0));
    let canvas = Canvas::overlay(&camera);
    let mut view = AvatarView::new(
        AvatarWidgets::complete(
            RectTransform::new(Vec2::new(140.0, 650.0), Vec2::new(260.0, 100.0)),
            20.0,
        ),
        canvas,
        camera,
        Box::new(move |_: &Canvas| {
            counter.set(counter.get() + 1);
            CharacterAttributeTips::new()
        }),
        &ViewConfig::default(),
    );
    view.init(&h).unwrap();

    assert_eq!(view.tooltip().phase(), TooltipPhase::NoTooltip);
    assert!(matches!(
        view.handle_pointer(PointerEvent::Exit),
        Err(ViewError::TooltipNotCreated)
    ));

    view.handle_pointer(PointerEvent::Enter).unwrap();
    let tips = view.tooltip().tooltip().unwrap();
    // screen (140, 650) -> canvas local (-500, 290); + 260 / 2 on x
    assert_eq!(tips.anchored_position(), Vec2::new(-370.0, 290.0));
    assert_eq!(tips.value_of("Exp"), Some("120 / 300"));
    assert_eq!(view.tooltip().phase(), TooltipPhase::Visible);

    view.handle_pointer(PointerEvent::Exit).unwrap();
    assert_eq!(view.tooltip().phase(), TooltipPhase::Hidden);

    // the next hover reuses the instance and shows fresh values
    h.borrow_mut().set_attack(33);
    view.handle_pointer(PointerEvent::Enter).unwrap();
    assert_eq!(view.tooltip().tooltip().unwrap().value_of("Attack"), Some("33"));
    assert_eq!(created.get(), 1);
}

#[test]
fn test_tooltip_follows_view_position() {
    let h = hero(CharacterAttributes {
        exp_table: ExpTable::new(vec![0, 100]),
        ..Default::default()
    });
    let mut view = view_at(Vec2::new(640.0, 360.0), 200.0);
    view.init(&h).unwrap();

    view.handle_pointer(PointerEvent::Enter).unwrap();
    assert_eq!(
        view.tooltip().tooltip().unwrap().anchored_position(),
        Vec2::new(100.0, 0.0)
    );

    view.set_rect(RectTransform::new(Vec2::new(840.0, 460.0), Vec2::new(200.0, 100.0)));
    view.handle_pointer(PointerEvent::Exit).unwrap();
    view.handle_pointer(PointerEvent::Enter).unwrap();
    assert_eq!(
        view.tooltip().tooltip().unwrap().anchored_position(),
        Vec2::new(300.0, 100.0)
    );
}
