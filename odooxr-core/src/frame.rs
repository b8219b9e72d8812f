use crate::error::XrError;
use crate::look::{adjust_reference_space, LookState};
use crate::platform::{FrameTarget, ReferenceSpace, SceneRenderer, ViewOf, XrFrame, XrSession};
use crate::session::SessionKind;

/// What one frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub has_pose: bool,
    pub views_drawn: usize,
}

/// The space a frame of `kind` renders against: the stored space as-is for
/// immersive sessions, offset by the look direction for inline ones.
pub fn resolve_space<Sp: ReferenceSpace>(
    kind: SessionKind,
    base: &Sp,
    look: &LookState,
) -> Result<Sp, XrError> {
    match kind {
        SessionKind::Immersive => Ok(base.clone()),
        SessionKind::Inline => adjust_reference_space(base, look),
    }
}

/// Render one XR frame.
///
/// `start_frame` and `end_frame` run exactly once. `schedule_next` runs right
/// after `start_frame` so the loop continues whatever happens while drawing.
/// Without a viewer pose nothing is drawn.
pub fn render_frame<S, T, C>(
    session: &S,
    frame: &S::Frame,
    space: &S::Space,
    target: &mut T,
    scene: &mut C,
    schedule_next: impl FnOnce(),
) -> FrameReport
where
    S: XrSession,
    T: FrameTarget<S>,
    C: SceneRenderer<ViewOf<S>>,
{
    let views = frame.viewer_views(space);

    scene.start_frame();
    schedule_next();

    let mut report = FrameReport {
        has_pose: views.is_some(),
        views_drawn: 0,
    };

    if let Some(views) = views {
        match target.begin_views(session) {
            Ok(()) => {
                for view in &views {
                    target.set_viewport(session, view);
                    scene.draw(view);
                    report.views_drawn += 1;
                }
            }
            Err(e) => log::warn!("{} frame skipped: {e}", session.kind()),
        }
    }

    scene.end_frame();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, MockFrame, MockHost, MockScene, MockSpace, MockView, MockWorld};
    use std::cell::Cell;

    fn run(world: &MockWorld, kind: SessionKind, views: Option<Vec<MockView>>) -> FrameReport {
        let session = world.session(kind);
        let frame = MockFrame::new(world, views);
        let mut host = MockHost::new(world);
        let mut scene = MockScene::new(world);
        render_frame(
            &session,
            &frame,
            &MockSpace::named("local"),
            &mut host,
            &mut scene,
            || world.record(Event::Scheduled),
        )
    }

    #[test]
    fn test_stereo_frame_sequence() {
        let world = MockWorld::new();
        let report = run(&world, SessionKind::Immersive, Some(vec![MockView(0), MockView(1)]));

        assert_eq!(report, FrameReport { has_pose: true, views_drawn: 2 });
        assert_eq!(
            world.events(),
            vec![
                Event::Pose("local".into()),
                Event::StartFrame,
                Event::Scheduled,
                Event::BeginViews(1),
                Event::Viewport(0),
                Event::Draw(0),
                Event::Viewport(1),
                Event::Draw(1),
                Event::EndFrame,
            ]
        );
    }

    #[test]
    fn test_missing_pose_still_brackets_and_schedules() {
        let world = MockWorld::new();
        let report = run(&world, SessionKind::Inline, None);

        assert_eq!(report, FrameReport { has_pose: false, views_drawn: 0 });
        assert_eq!(
            world.events(),
            vec![
                Event::Pose("local".into()),
                Event::StartFrame,
                Event::Scheduled,
                Event::EndFrame,
            ]
        );
    }

    #[test]
    fn test_render_target_failure_skips_draws_only() {
        let world = MockWorld::new();
        world.fail_render_target.set(true);
        let scheduled = Cell::new(0);

        let session = world.session(SessionKind::Immersive);
        let frame = MockFrame::new(&world, Some(vec![MockView(0)]));
        let mut host = MockHost::new(&world);
        let mut scene = MockScene::new(&world);
        let report = render_frame(
            &session,
            &frame,
            &MockSpace::named("local"),
            &mut host,
            &mut scene,
            || scheduled.set(scheduled.get() + 1),
        );

        assert_eq!(report, FrameReport { has_pose: true, views_drawn: 0 });
        assert_eq!(scheduled.get(), 1);
        assert_eq!(world.count(|e| matches!(e, Event::Draw(_))), 0);
        assert_eq!(world.count(|e| *e == Event::EndFrame), 1);
    }

    // ── resolve_space ──

    #[test]
    fn test_immersive_space_passes_through() {
        let mut look = LookState::new();
        look.rotate_view(100.0, 100.0);
        let base = MockSpace::named("local");
        let space = resolve_space(SessionKind::Immersive, &base, &look).unwrap();
        assert!(space.offsets.is_empty());
    }

    #[test]
    fn test_inline_space_is_offset_by_look() {
        let mut look = LookState::new();
        look.rotate_view(100.0, 100.0);
        let base = MockSpace::named("viewer");
        let space = resolve_space(SessionKind::Inline, &base, &look).unwrap();
        assert_eq!(space.offsets, vec![look.offset_transform()]);
    }
}
