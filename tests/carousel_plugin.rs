use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use snap_carousel::carousel::{
    AnimationConfig, CarouselConfig, Easing, GesturePhase, GestureSignal, OverlayTiming,
};
use snap_carousel::file::CarouselItem;
use snap_carousel::widgets::card::CarouselCard;
use snap_carousel::widgets::carousel::{
    ActiveIndexChanged, CarouselCommit, CarouselMotion, CarouselPlugin, CarouselSet,
    CarouselTrack, CarouselWidget, DragSignal, ScrollRequest, TrackLayer,
};

#[derive(Resource)]
struct Fixture {
    carousel: Entity,
}

#[derive(Resource)]
struct FixtureSetup {
    item_count: usize,
    initial_index: i32,
}

#[derive(Resource, Default)]
struct Observed(Vec<ActiveIndexChanged>);

fn config(initial_index: i32) -> CarouselConfig {
    CarouselConfig {
        initial_index,
        settle: AnimationConfig::timing(0.2, Easing::QuadraticInOut),
        overlay: OverlayTiming {
            fade_in_delay: 0.05,
            fade_out_delay: 0.05,
            fade: AnimationConfig::timing(0.1, Easing::Linear),
        },
        ..default()
    }
}

fn spawn_fixture(mut commands: Commands, setup: Res<FixtureSetup>) {
    let items = (0..setup.item_count)
        .map(|i| CarouselItem::new(format!("Campground {i}")))
        .collect();
    let carousel = CarouselWidget::builder(items)
        .config(config(setup.initial_index))
        .viewport_width(400.0)
        .spawn(&mut commands);
    commands.insert_resource(Fixture { carousel });
}

fn record_changes(mut changes: MessageReader<ActiveIndexChanged>, mut observed: ResMut<Observed>) {
    observed.0.extend(changes.read().copied());
}

fn app(item_count: usize, initial_index: i32) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
        .insert_resource(FixtureSetup { item_count, initial_index })
        .init_resource::<Observed>()
        .add_plugins(CarouselPlugin)
        .add_systems(Startup, spawn_fixture)
        .add_systems(Update, record_changes.after(CarouselSet::Commit));
    app.update();
    app
}

fn carousel(app: &App) -> Entity {
    app.world().resource::<Fixture>().carousel
}

fn drag(app: &mut App, delta_x: f32) {
    let carousel = carousel(app);
    let world = app.world_mut();
    for signal in [
        GestureSignal::Start,
        GestureSignal::Move { delta_x: delta_x / 2.0 },
        GestureSignal::Move { delta_x },
        GestureSignal::End { delta_x },
    ] {
        world.write_message(DragSignal { carousel, signal });
    }
    app.update();
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn active_index(app: &App) -> i32 {
    app.world().get::<CarouselCommit>(carousel(app)).unwrap().0.active_index()
}

fn track(app: &mut App, layer: TrackLayer) -> Entity {
    let mut tracks = app.world_mut().query::<(Entity, &CarouselTrack)>();
    tracks
        .iter(app.world())
        .find(|(_, track)| track.layer == layer)
        .map(|(entity, _)| entity)
        .unwrap()
}

fn cards(app: &mut App, layer: TrackLayer) -> Vec<(Entity, CarouselCard)> {
    let track = track(app, layer);
    let world = app.world();
    world
        .get::<Children>(track)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| world.get::<CarouselCard>(child).map(|card| (child, *card)))
                .collect()
        })
        .unwrap_or_default()
}

fn track_left(app: &mut App, layer: TrackLayer) -> f32 {
    let track = track(app, layer);
    match app.world().get::<Node>(track).unwrap().left {
        Val::Px(x) => x,
        other => panic!("unexpected track position {other:?}"),
    }
}

#[test]
fn tracks_render_a_window_around_the_initial_index() {
    let mut app = app(10, 2);
    let primary = cards(&mut app, TrackLayer::Primary);
    let offsets: Vec<i32> = primary.iter().map(|(_, card)| card.slot_offset).collect();
    assert_eq!(offsets, vec![-2, -1, 0, 1, 2]);
    assert!(primary.iter().all(|(_, card)| !card.placeholder));
    assert_eq!(track_left(&mut app, TrackLayer::Primary), 50.0 - 600.0);
}

#[test]
fn drag_past_threshold_commits_after_settle() {
    let mut app = app(10, 2);
    drag(&mut app, -150.0);

    let motion = &app.world().get::<CarouselMotion>(carousel(&app)).unwrap().0;
    assert_eq!(motion.resting_index(), 3);
    assert_eq!(active_index(&app), 2);
    assert!(app.world().resource::<Observed>().0.is_empty());

    run(&mut app, 40);
    assert_eq!(active_index(&app), 3);
    let observed = &app.world().resource::<Observed>().0;
    assert_eq!(observed.len(), 1);
    assert_eq!((observed[0].previous, observed[0].current), (2, 3));

    // Re-centered on the new index, so the track is back where it started.
    assert!((track_left(&mut app, TrackLayer::Primary) - (50.0 - 600.0)).abs() < 1e-3);
    let overlay = track(&mut app, TrackLayer::Overlay);
    assert_eq!(app.world().get::<Visibility>(overlay), Some(&Visibility::Hidden));
}

#[test]
fn short_drag_snaps_back_without_rebuilding_cards() {
    let mut app = app(10, 2);
    let before: Vec<Entity> = cards(&mut app, TrackLayer::Primary).into_iter().map(|(e, _)| e).collect();

    drag(&mut app, -80.0);
    run(&mut app, 40);

    assert_eq!(active_index(&app), 2);
    assert!(app.world().resource::<Observed>().0.is_empty());
    let after: Vec<Entity> = cards(&mut app, TrackLayer::Primary).into_iter().map(|(e, _)| e).collect();
    assert_eq!(before, after);
}

#[test]
fn commit_rebuilds_only_the_primary_track() {
    let mut app = app(10, 2);
    let overlay_before: Vec<Entity> = cards(&mut app, TrackLayer::Overlay).into_iter().map(|(e, _)| e).collect();
    let primary_before: Vec<Entity> = cards(&mut app, TrackLayer::Primary).into_iter().map(|(e, _)| e).collect();

    drag(&mut app, -150.0);
    run(&mut app, 40);

    let overlay_after: Vec<Entity> = cards(&mut app, TrackLayer::Overlay).into_iter().map(|(e, _)| e).collect();
    let primary_after: Vec<Entity> = cards(&mut app, TrackLayer::Primary).into_iter().map(|(e, _)| e).collect();
    assert_eq!(overlay_before, overlay_after);
    assert_ne!(primary_before, primary_after);
    assert_eq!(primary_after.len(), 5);
}

#[test]
fn edges_clamp_and_render_placeholders() {
    let mut app = app(3, 0);
    let placeholders: Vec<bool> = cards(&mut app, TrackLayer::Primary)
        .into_iter()
        .map(|(_, card)| card.placeholder)
        .collect();
    assert_eq!(placeholders, vec![true, true, false, false, false]);

    drag(&mut app, 200.0);
    run(&mut app, 40);
    assert_eq!(active_index(&app), 0);
    assert!(app.world().resource::<Observed>().0.is_empty());
}

#[test]
fn scroll_request_commits_the_requested_index() {
    let mut app = app(10, 2);
    let carousel = carousel(&app);
    app.world_mut().write_message(ScrollRequest { carousel, index: 6 });
    run(&mut app, 40);

    assert_eq!(active_index(&app), 6);
    let observed = &app.world().resource::<Observed>().0;
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].current, 6);
}

#[test]
fn cancelled_drag_settles_and_releases_the_carousel() {
    let mut app = app(10, 2);
    let carousel = carousel(&app);
    for signal in [
        GestureSignal::Start,
        GestureSignal::Move { delta_x: -200.0 },
        GestureSignal::Cancel,
    ] {
        app.world_mut().write_message(DragSignal { carousel, signal });
    }
    run(&mut app, 40);

    let motion = &app.world().get::<CarouselMotion>(carousel).unwrap().0;
    assert_eq!(motion.phase(), GesturePhase::Inactive);
    assert!(!motion.is_settling());
    assert_eq!(active_index(&app), 2);
    assert!(app.world().resource::<Observed>().0.is_empty());
    assert!((track_left(&mut app, TrackLayer::Primary) - (50.0 - 600.0)).abs() < 1e-3);
    let overlay = track(&mut app, TrackLayer::Overlay);
    assert_eq!(app.world().get::<Visibility>(overlay), Some(&Visibility::Hidden));

    app.world_mut().write_message(ScrollRequest { carousel, index: 4 });
    run(&mut app, 40);
    assert_eq!(active_index(&app), 4);
}
