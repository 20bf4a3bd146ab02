//! Bevy front end for the carousel engine.
//!
//! Picking observers turn drags into [`DragSignal`]s. The animation domain
//! lives in [`CarouselMotion`] and is ticked every frame; whatever it hands
//! off travels as [`CarouselHandoff`] messages and is the only thing that
//! ever mutates [`CarouselCommit`]. The render set then positions both
//! tracks and rebuilds a track's cards only when its window moved.

use bevy::picking::events::Cancel;
use bevy::picking::pointer::PointerButton;
use bevy::prelude::*;

use crate::carousel::window::render_window;
use crate::carousel::{
    AnimationDomain, CarouselConfig, CommitDomain, CommitEvent, GestureSignal, Handoff,
    TrackFrame,
};
use crate::file::CarouselItem;
use crate::widgets::card::{spawn_card, CardContext, CardStyle};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CarouselSet {
    Capture,
    Animate,
    Commit,
    Render,
}

/// Pointer input for one carousel.
#[derive(Message, Debug, Clone, Copy)]
pub struct DragSignal {
    pub carousel: Entity,
    pub signal: GestureSignal,
}

/// Programmatic navigation, e.g. from the page indicator.
#[derive(Message, Debug, Clone, Copy)]
pub struct ScrollRequest {
    pub carousel: Entity,
    pub index: i32,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct CarouselHandoff {
    pub carousel: Entity,
    pub handoff: Handoff,
}

/// Sent once per committed index change.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveIndexChanged {
    pub carousel: Entity,
    pub previous: i32,
    pub current: i32,
}

#[derive(Component, Debug, Clone)]
pub struct CarouselWidget {
    pub config: CarouselConfig,
    pub style: CardStyle,
}

#[derive(Component, Debug, Clone)]
pub struct CarouselMotion(pub AnimationDomain);

#[derive(Component, Debug, Clone)]
pub struct CarouselCommit(pub CommitDomain);

#[derive(Component, Debug, Clone, Default)]
pub struct CarouselItems(pub Vec<CarouselItem>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackLayer {
    Primary,
    Overlay,
}

/// What a track's children were last built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedWindow {
    pub index: i32,
    pub card_width: f32,
}

#[derive(Component, Debug, Clone)]
pub struct CarouselTrack {
    pub carousel: Entity,
    pub layer: TrackLayer,
    pub rendered: Option<RenderedWindow>,
    applied_opacity: Option<f32>,
}

impl CarouselTrack {
    fn new(carousel: Entity, layer: TrackLayer) -> Self {
        Self {
            carousel,
            layer,
            rendered: None,
            applied_opacity: None,
        }
    }
}

pub struct CarouselBuilder {
    items: Vec<CarouselItem>,
    config: CarouselConfig,
    style: CardStyle,
    viewport_width: f32,
}

impl CarouselBuilder {
    pub fn config(mut self, config: CarouselConfig) -> Self {
        self.config = config;
        self
    }

    pub fn style(mut self, style: CardStyle) -> Self {
        self.style = style;
        self
    }

    pub fn initial_index(mut self, index: i32) -> Self {
        self.config.initial_index = index;
        self
    }

    /// Width used until the root node has been laid out.
    pub fn viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn spawn(self, commands: &mut Commands) -> Entity {
        let motion = AnimationDomain::new(&self.config, self.viewport_width, self.items.len());
        let commit = CommitDomain::new(&self.config);
        let height = self.style.height;

        let root = commands
            .spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(height),
                    overflow: Overflow::clip(),
                    ..default()
                },
                CarouselWidget {
                    config: self.config,
                    style: self.style,
                },
                CarouselMotion(motion),
                CarouselCommit(commit),
                CarouselItems(self.items),
            ))
            .id();

        for layer in [TrackLayer::Primary, TrackLayer::Overlay] {
            let track = commands
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        top: Val::Px(0.0),
                        height: Val::Percent(100.0),
                        flex_direction: FlexDirection::Row,
                        ..default()
                    },
                    if layer == TrackLayer::Overlay { Visibility::Hidden } else { Visibility::Inherited },
                    CarouselTrack::new(root, layer),
                ))
                .id();
            commands.entity(root).add_child(track);
        }

        commands
            .entity(root)
            .observe(move |mut drag: On<Pointer<DragStart>>, mut signals: MessageWriter<DragSignal>| {
                if drag.button != PointerButton::Primary {
                    return;
                }
                drag.propagate(false);
                signals.write(DragSignal { carousel: root, signal: GestureSignal::Start });
            })
            .observe(move |mut drag: On<Pointer<Drag>>, mut signals: MessageWriter<DragSignal>| {
                if drag.button != PointerButton::Primary {
                    return;
                }
                drag.propagate(false);
                let delta_x = drag.distance.x;
                signals.write(DragSignal { carousel: root, signal: GestureSignal::Move { delta_x } });
            })
            .observe(move |mut drag: On<Pointer<DragEnd>>, mut signals: MessageWriter<DragSignal>| {
                if drag.button != PointerButton::Primary {
                    return;
                }
                drag.propagate(false);
                let delta_x = drag.distance.x;
                signals.write(DragSignal { carousel: root, signal: GestureSignal::End { delta_x } });
            })
            // Touch cancel ends the drag without a DragEnd.
            .observe(move |mut cancel: On<Pointer<Cancel>>, mut signals: MessageWriter<DragSignal>| {
                cancel.propagate(false);
                signals.write(DragSignal { carousel: root, signal: GestureSignal::Cancel });
            });

        debug!("spawned carousel {root}");
        root
    }
}

impl CarouselWidget {
    pub fn builder(items: Vec<CarouselItem>) -> CarouselBuilder {
        CarouselBuilder {
            items,
            config: CarouselConfig::default(),
            style: CardStyle::default(),
            viewport_width: 0.0,
        }
    }
}

pub struct CarouselPlugin;

impl Plugin for CarouselPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DragSignal>()
            .add_message::<ScrollRequest>()
            .add_message::<CarouselHandoff>()
            .add_message::<ActiveIndexChanged>()
            .configure_sets(
                Update,
                (
                    CarouselSet::Capture,
                    CarouselSet::Animate,
                    CarouselSet::Commit,
                    CarouselSet::Render,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (track_viewport, sync_item_count, apply_drag_signals, apply_scroll_requests)
                    .chain()
                    .in_set(CarouselSet::Capture),
            )
            .add_systems(Update, advance_motion.in_set(CarouselSet::Animate))
            .add_systems(
                Update,
                (apply_handoffs, advance_overlay).chain().in_set(CarouselSet::Commit),
            )
            .add_systems(
                Update,
                (render_windows, position_tracks).chain().in_set(CarouselSet::Render),
            );
    }
}

fn track_viewport(mut carousels: Query<(Entity, &ComputedNode, &mut CarouselMotion), Changed<ComputedNode>>) {
    for (entity, node, mut motion) in &mut carousels {
        let width = node.size().x * node.inverse_scale_factor();
        // Not laid out yet.
        if width <= 0.0 {
            continue;
        }
        if motion.0.resize(width) {
            debug!("carousel {entity} viewport is now {width:.1}px");
        }
    }
}

fn sync_item_count(mut carousels: Query<(&CarouselItems, &mut CarouselMotion), Changed<CarouselItems>>) {
    for (items, mut motion) in &mut carousels {
        if motion.0.item_count() != items.0.len() {
            motion.0.set_item_count(items.0.len());
        }
    }
}

fn apply_drag_signals(
    mut signals: MessageReader<DragSignal>,
    mut carousels: Query<&mut CarouselMotion>,
    mut handoffs: MessageWriter<CarouselHandoff>,
) {
    let mut outbox = Vec::new();
    for &DragSignal { carousel, signal } in signals.read() {
        let Ok(mut motion) = carousels.get_mut(carousel) else {
            continue;
        };
        motion.0.handle(signal, &mut outbox);
        for handoff in outbox.drain(..) {
            handoffs.write(CarouselHandoff { carousel, handoff });
        }
    }
}

fn apply_scroll_requests(
    mut requests: MessageReader<ScrollRequest>,
    mut carousels: Query<&mut CarouselMotion>,
    mut handoffs: MessageWriter<CarouselHandoff>,
) {
    let mut outbox = Vec::new();
    for &ScrollRequest { carousel, index } in requests.read() {
        let Ok(mut motion) = carousels.get_mut(carousel) else {
            continue;
        };
        if !motion.0.scroll_to(index, &mut outbox) {
            trace!("carousel {carousel} ignored scroll to {index}");
        }
        for handoff in outbox.drain(..) {
            handoffs.write(CarouselHandoff { carousel, handoff });
        }
    }
}

fn advance_motion(
    time: Res<Time>,
    mut carousels: Query<(Entity, &mut CarouselMotion)>,
    mut handoffs: MessageWriter<CarouselHandoff>,
) {
    let delta = time.delta_secs();
    let mut outbox = Vec::new();
    for (carousel, mut motion) in &mut carousels {
        if !motion.0.is_settling() {
            continue;
        }
        motion.0.tick(delta, &mut outbox);
        for handoff in outbox.drain(..) {
            handoffs.write(CarouselHandoff { carousel, handoff });
        }
    }
}

fn apply_handoffs(
    mut handoffs: MessageReader<CarouselHandoff>,
    mut carousels: Query<&mut CarouselCommit>,
    mut changes: MessageWriter<ActiveIndexChanged>,
) {
    for &CarouselHandoff { carousel, handoff } in handoffs.read() {
        let Ok(mut commit) = carousels.get_mut(carousel) else {
            continue;
        };
        match commit.0.apply(handoff) {
            Some(CommitEvent::Index(change)) => {
                info!("carousel {carousel} now on item {}", change.current);
                changes.write(ActiveIndexChanged {
                    carousel,
                    previous: change.previous,
                    current: change.current,
                });
            }
            Some(CommitEvent::Overlay(transition)) => {
                trace!("carousel {carousel} overlay {transition:?}");
            }
            None => {}
        }
    }
}

fn advance_overlay(time: Res<Time>, mut carousels: Query<&mut CarouselCommit>) {
    let delta = time.delta_secs();
    for mut commit in &mut carousels {
        if commit.0.overlay().is_fading() {
            commit.0.tick(delta);
        }
    }
}

fn window_index(commit: &CommitDomain, layer: TrackLayer) -> i32 {
    match layer {
        TrackLayer::Primary => commit.state().active_index,
        TrackLayer::Overlay => commit.state().overlay_active_index,
    }
}

fn render_windows(
    mut commands: Commands,
    carousels: Query<(&CarouselWidget, &CarouselMotion, &CarouselCommit, Ref<CarouselItems>)>,
    mut tracks: Query<(Entity, &mut CarouselTrack)>,
    asset_server: Option<Res<AssetServer>>,
) {
    for (entity, mut track) in &mut tracks {
        let Ok((widget, motion, commit, items)) = carousels.get(track.carousel) else {
            continue;
        };
        let window = RenderedWindow {
            index: window_index(&commit.0, track.layer),
            card_width: motion.0.layout().card_width(),
        };
        if track.rendered == Some(window) && !items.is_changed() {
            continue;
        }

        let ctx = CardContext {
            width: window.card_width,
            style: &widget.style,
            asset_server: asset_server.as_deref(),
        };
        commands.entity(entity).despawn_related::<Children>();
        commands.entity(entity).with_children(|parent| {
            render_window(window.index, &items.0, widget.config.window_radius, |item, slot_offset| {
                spawn_card(parent, &ctx, item, slot_offset)
            });
        });
        trace!("rebuilt {:?} track around item {}", track.layer, window.index);
        track.rendered = Some(window);
        track.applied_opacity = None;
    }
}

fn position_tracks(
    carousels: Query<(&CarouselWidget, &CarouselMotion, &CarouselCommit)>,
    mut tracks: Query<(Entity, &mut CarouselTrack, &mut Node, &mut Visibility)>,
    children: Query<&Children>,
    mut backgrounds: Query<&mut BackgroundColor>,
    mut texts: Query<&mut TextColor>,
    mut images: Query<&mut ImageNode>,
) {
    for (entity, mut track, mut node, mut visibility) in &mut tracks {
        let Ok((widget, motion, commit)) = carousels.get(track.carousel) else {
            continue;
        };
        let frame = TrackFrame::compute(&motion.0, &commit.0, widget.config.window_radius);
        let slots = (2 * widget.config.window_radius.max(0) + 1) as f32;
        let x = match track.layer {
            TrackLayer::Primary => frame.primary_x,
            TrackLayer::Overlay => frame.overlay_x,
        };
        node.left = Val::Px(x);
        node.width = Val::Px(frame.card_width * slots);

        if track.layer != TrackLayer::Overlay || track.applied_opacity == Some(frame.overlay_opacity) {
            continue;
        }
        let alpha = frame.overlay_opacity;
        *visibility = if alpha > 0.0 { Visibility::Inherited } else { Visibility::Hidden };
        for descendant in children.iter_descendants(entity) {
            if let Ok(mut background) = backgrounds.get_mut(descendant) {
                background.0.set_alpha(alpha);
            }
            if let Ok(mut text) = texts.get_mut(descendant) {
                text.0.set_alpha(alpha);
            }
            if let Ok(mut image) = images.get_mut(descendant) {
                image.color.set_alpha(alpha);
            }
        }
        track.applied_opacity = Some(alpha);
    }
}
