use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tui_model_navigator::{
    DomainModel, ElementKind, ItemModel, MemoryLog, ModelElement, ModelIndex, NavigatorModel,
    NavigatorViewState, ViewAction,
};

struct BenchModel {
    bodies: usize,
}

impl DomainModel for BenchModel {
    fn name(&self) -> &str {
        "bench"
    }

    fn init_system(&mut self) {}

    fn elements(&self) -> Vec<ModelElement> {
        let bodies = (0..self.bodies)
            .map(|idx| ModelElement::new(format!("body_{idx}"), ElementKind::Body));
        let joints = (0..self.bodies)
            .map(|idx| ModelElement::new(format!("joint_{idx}"), ElementKind::Joint));
        vec![
            ModelElement::group("Bodies").with_children(bodies),
            ModelElement::group("Joints").with_children(joints),
        ]
    }
}

fn load_close_cycle(c: &mut Criterion) {
    c.bench_function("load_close_16_models", |b| {
        b.iter(|| {
            let mut nav: NavigatorModel<BenchModel, MemoryLog> =
                NavigatorModel::with_logger(MemoryLog::new());
            for _ in 0..16 {
                nav.load_model(BenchModel { bodies: 32 });
            }
            while nav.active_model().is_some() {
                nav.close_current_model();
            }
            black_box(nav.process_deferred())
        });
    });
}

fn visible_rows_rebuild(c: &mut Criterion) {
    let mut nav: NavigatorModel<BenchModel, MemoryLog> =
        NavigatorModel::with_logger(MemoryLog::new());
    for _ in 0..8 {
        nav.load_model(BenchModel { bodies: 128 });
    }
    let mut state = NavigatorViewState::new();
    state.sync(&mut nav);
    state.handle_action(&nav, ViewAction::<()>::ExpandAll);

    c.bench_function("visible_rows_expanded", |b| {
        b.iter(|| {
            state.invalidate();
            state.ensure_visible_rows(&nav);
            black_box(state.visible_len())
        });
    });

    c.bench_function("index_walk", |b| {
        b.iter(|| {
            let root = ModelIndex::invalid();
            let mut total = 0;
            for row in 0..nav.row_count(&root) {
                let model = nav.index(row, 0, &root);
                for group in 0..nav.row_count(&model) {
                    total += nav.row_count(&nav.index(group, 0, &model));
                }
            }
            black_box(total)
        });
    });
}

criterion_group!(benches, load_close_cycle, visible_rows_rebuild);
criterion_main!(benches);
