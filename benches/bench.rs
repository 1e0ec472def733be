use actorpool::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::{cell::RefCell, rc::Rc};

const PAYLOAD_SIZE: usize = 64 * 1024;

struct Particle {
    transform: Transform,
    payload: Vec<u8>,
}

impl Actor for Particle {
    #[inline(always)]
    fn set_tick_enabled(&mut self, _enabled: bool) {}
    #[inline(always)]
    fn set_collision_enabled(&mut self, _enabled: bool) {}
    #[inline(always)]
    fn set_hidden(&mut self, _hidden: bool) {}
    #[inline(always)]
    fn transform(&self) -> Transform {
        self.transform
    }
    #[inline(always)]
    fn set_transform(&mut self, transform: &Transform) {
        self.transform = *transform;
    }
    #[inline(always)]
    fn set_owner(&mut self, _owner: Option<ActorHandle>) {}
}

#[derive(Default)]
struct Arena {
    actors: Vec<Rc<RefCell<Particle>>>,
}

impl World for Arena {
    fn spawn_actor(&mut self, _class: ActorClass, transform: &Transform) -> ActorHandle {
        let particle = Rc::new(RefCell::new(Particle {
            transform: *transform,
            payload: vec![0; PAYLOAD_SIZE],
        }));
        let handle = ActorHandle::new(&particle);
        self.actors.push(particle);
        handle
    }

    fn destroy_actor(&mut self, actor: ActorHandle) {
        self.actors.retain(|p| !ActorHandle::new(p).ptr_eq(&actor));
    }
}

fn spawn(c: &mut Criterion) {
    let class = ActorClass::of::<Particle>();
    let at = Transform::from_translation([1.0, 2.0, 3.0]);

    c.bench_function("actorpool", |b| {
        let mut pool = ActorPool::new(Arena::default(), PoolConfig::default());
        pool.pre_warm(class, 1024);
        b.iter(|| {
            let actor = black_box(pool.spawn_actor(class, &at, None, false));
            pool.return_to_pool(&actor, false);
        })
    });
    c.bench_function("actorpool_broadcast", |b| {
        let mut pool = ActorPool::new(Arena::default(), PoolConfig::default());
        pool.pre_warm(class, 1024);
        for _ in 0..4 {
            pool.on_actor_spawned().subscribe(|e: &PoolEvent| {
                black_box(e.transform);
                Ok(())
            });
        }
        b.iter(|| {
            let actor = black_box(pool.spawn_actor(class, &at, None, true));
            pool.return_to_pool(&actor, false);
        })
    });
    c.bench_function("fresh", |b| {
        let mut arena = Arena::default();
        b.iter(|| {
            let actor = black_box(arena.spawn_actor(class, &at));
            black_box(actor.inspect(|p: &Particle| p.payload.len()));
            arena.destroy_actor(actor);
        })
    });
}

criterion_group!(benches, spawn);
criterion_main!(benches);
