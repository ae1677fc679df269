use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maildraft_blocks::{create_block, BlockIdGenerator, BlockType};
use maildraft_compiler_html::{compile, compile_to_html, CompileOptions};

fn newsletter(repeat: usize) -> Vec<maildraft_blocks::Block> {
    let mut ids = BlockIdGenerator::new("bench");
    let mut blocks = Vec::new();
    for _ in 0..repeat {
        for block_type in BlockType::ALL {
            blocks.push(create_block(ids.new_id(), block_type));
        }
    }
    blocks
}

fn compile_every_block_type(c: &mut Criterion) {
    let blocks = newsletter(1);

    c.bench_function("compile_every_block_type", |b| {
        b.iter(|| compile(black_box(&blocks)))
    });
}

fn compile_long_newsletter(c: &mut Criterion) {
    let blocks = newsletter(25);

    c.bench_function("compile_long_newsletter", |b| {
        b.iter(|| compile(black_box(&blocks)))
    });
}

fn compile_compact(c: &mut Criterion) {
    let blocks = newsletter(25);

    c.bench_function("compile_compact", |b| {
        b.iter(|| {
            let options = CompileOptions {
                pretty: false,
                ..Default::default()
            };
            compile_to_html(black_box(&blocks), options)
        })
    });
}

criterion_group!(
    benches,
    compile_every_block_type,
    compile_long_newsletter,
    compile_compact
);
criterion_main!(benches);
