use criterion::{Criterion, black_box, criterion_group, criterion_main};
use widget_slots::logging::{LogEvent, LogSink};
use widget_slots::{
    FnRenderer, Logger, LoggingResult, MemoryDocument, RenderError, RuntimeConfig, SlotProperties,
    SlotRuntime, Surface, WidgetDescriptor,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

const SLOTS: [&str; 4] = ["header", "sidebar", "content", "footer"];

fn descriptor(version: &str) -> WidgetDescriptor {
    SLOTS.iter().fold(WidgetDescriptor::new("dashboard", version), |acc, slot| {
        acc.with_slot(*slot, SlotProperties::new(format!("#{slot}")))
    })
}

fn expensive_markup(descriptor: &WidgetDescriptor, slot: &str) -> Result<String, RenderError> {
    let rows: String = (0..200)
        .map(|row| format!("<li data-row=\"{row}\">{slot} {}</li>", descriptor.version))
        .collect();
    Ok(format!("<ul>{rows}</ul>"))
}

fn build_runtime(document: &mut MemoryDocument) -> SlotRuntime {
    let mut config = RuntimeConfig {
        logger: Some(Logger::new(NullSink)),
        ..RuntimeConfig::default()
    };
    config.enable_metrics();
    let mut runtime = SlotRuntime::new(FnRenderer::new(expensive_markup), config);
    for slot in SLOTS {
        document.insert(format!("#{slot}"), "");
        runtime
            .mount(slot, None, &mut Surface::client(&mut *document))
            .expect("mount");
    }
    runtime
}

fn cached_passes(c: &mut Criterion) {
    let mut document = MemoryDocument::new();
    let mut runtime = build_runtime(&mut document);
    let stable = descriptor("1.0.0");
    runtime
        .render_pass(Some(&stable), &mut Surface::client(&mut document))
        .expect("warm pass");

    c.bench_function("reconcile_cached_pass", |b| {
        b.iter(|| {
            runtime
                .render_pass(black_box(Some(&stable)), &mut Surface::client(&mut document))
                .expect("pass")
        });
    });
}

fn cold_passes(c: &mut Criterion) {
    let mut document = MemoryDocument::new();
    let mut runtime = build_runtime(&mut document);
    let versions = [descriptor("1.0.0"), descriptor("1.0.1")];
    let mut flip = 0usize;

    c.bench_function("reconcile_version_flip_pass", |b| {
        b.iter(|| {
            flip ^= 1;
            runtime
                .render_pass(
                    black_box(Some(&versions[flip])),
                    &mut Surface::client(&mut document),
                )
                .expect("pass")
        });
    });
}

fn server_render(c: &mut Criterion) {
    let mut document = MemoryDocument::new();
    let mut runtime = build_runtime(&mut document);
    let stable = descriptor("1.0.0");

    c.bench_function("render_to_string", |b| {
        b.iter(|| runtime.render_to_string(black_box(Some(&stable))).expect("server"));
    });
}

criterion_group!(benches, cached_passes, cold_passes, server_render);
criterion_main!(benches);
