// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::DVec3;
use kurbo::Point;
use ortho_display::{
    ConditionId, DisplayActionBroadcast, SliceViewport, ViewDirection, ViewportSet,
};
use ortho_geometry::PlaneGeometry;
use ortho_interaction::event::{
    EventKind, InteractionEvent, Modifiers, MouseButtons, PointerPosition, RendererId,
};

fn shift_press(x: f64, y: f64) -> InteractionEvent {
    InteractionEvent::new(
        Some(RendererId(0)),
        EventKind::MousePress {
            button: MouseButtons::LEFT,
            position: PointerPosition::new(Point::new(x, y), DVec3::new(x, y, 0.0)),
        },
    )
    .with_modifiers(Modifiers::SHIFT)
}

/// The standard triple plus `extra` sagittal views spread along x.
fn views(extra: u32) -> ViewportSet {
    let mut set: ViewportSet = SliceViewport::standard_triple(0, DVec3::ZERO, DVec3::ONE)
        .into_iter()
        .collect();
    for i in 0..extra {
        let x = 50.0 + f64::from(i) * 25.0;
        set.insert(SliceViewport::new(
            RendererId(3 + i),
            ViewDirection::Sagittal,
            PlaneGeometry::sagittal(DVec3::new(x, 0.0, 0.0), DVec3::ONE),
        ));
    }
    set
}

fn bench_conditions(c: &mut Criterion) {
    let near_line = shift_press(5.0, 20.0);
    let far = shift_press(30.0, 40.0);

    let mut group = c.benchmark_group("check_can_rotate");
    for &extra in &[0_u32, 8, 64] {
        let mut b3 = DisplayActionBroadcast::with_standard_behavior(views(extra));
        group.bench_function(format!("grab_views{}", 3 + extra), |b| {
            b.iter(|| black_box(b3.check_condition(ConditionId::CheckCanRotate, black_box(&near_line))));
        });
        group.bench_function(format!("miss_views{}", 3 + extra), |b| {
            b.iter(|| black_box(b3.check_condition(ConditionId::CheckCanRotate, black_box(&far))));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("check_can_swivel");
    let mut b3 = DisplayActionBroadcast::with_standard_behavior(views(0));
    group.bench_function("views3", |b| {
        b.iter(|| black_box(b3.check_condition(ConditionId::CheckCanSwivel, black_box(&far))));
    });
    group.finish();
}

criterion_group!(benches, bench_conditions);
criterion_main!(benches);
