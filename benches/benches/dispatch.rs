// Copyright 2025 the Ortho Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::DVec3;
use kurbo::Point;
use ortho_interaction::dispatcher::{Dispatcher, Interactor, Listener};
use ortho_interaction::event::{
    EventKind, InteractionEvent, MouseButtons, PointerPosition, RendererId,
};

/// Scores by a fixed value and accepts when its turn comes.
struct Candidate {
    score: f32,
    accept: bool,
}

impl Interactor for Candidate {
    fn jurisdiction(&self, _event: &InteractionEvent) -> f32 {
        self.score
    }

    fn handle_event(&mut self, _event: &InteractionEvent) -> bool {
        self.accept
    }
}

struct Sink(u64);

impl Listener for Sink {
    fn notify(&mut self, _event: &InteractionEvent, handled: bool) {
        self.0 += u64::from(handled);
    }
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_f32(&mut self) -> f32 {
        // xorshift64*
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let v = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (v >> 40) as f32 / (1_u64 << 24) as f32
    }
}

fn press() -> InteractionEvent {
    InteractionEvent::new(
        Some(RendererId(0)),
        EventKind::MousePress {
            button: MouseButtons::LEFT,
            position: PointerPosition::new(Point::new(1.0, 2.0), DVec3::new(1.0, 2.0, 0.0)),
        },
    )
}

/// `n` candidates with random scores; only the lowest-ranked one accepts.
fn build(n: usize, listeners: usize) -> Dispatcher {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    let mut d: Dispatcher = Dispatcher::new();
    for i in 0..n {
        let last = i + 1 == n;
        let score = if last { 1e-3 } else { 0.01 + rng.next_f32() };
        d.add_interactor(Rc::new(RefCell::new(Candidate {
            score,
            accept: last,
        })));
    }
    for _ in 0..listeners {
        d.add_listener(Rc::new(RefCell::new(Sink(0))));
    }
    d
}

fn bench_dispatch(c: &mut Criterion) {
    let ev = press();
    let mut group = c.benchmark_group("dispatch_full_walk");
    for &n in &[4_usize, 32, 256] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n{n}"), |b| {
            b.iter_batched(
                || build(n, 0),
                |mut d| black_box(d.dispatch(black_box(&ev))),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();

    let mut group = c.benchmark_group("process_with_listeners");
    for &l in &[1_usize, 16] {
        group.bench_function(format!("n32_l{l}"), |b| {
            let mut d = build(32, l);
            b.iter(|| black_box(d.process(black_box(&ev))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
