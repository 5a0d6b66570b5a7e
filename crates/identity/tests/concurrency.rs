use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use objid_identity::{IdentityRegistry, ObjectId, RegistryOptions};

const THREADS: usize = 16;

#[test]
fn racing_first_observation_mints_once() {
	let registry = IdentityRegistry::new();
	let obj = Arc::new(String::from("contended"));
	let barrier = Barrier::new(THREADS);

	let ids: HashSet<ObjectId> = thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				s.spawn(|| {
					barrier.wait();
					(0..100).map(|_| registry.get_or_assign_id(&obj)).collect::<Vec<_>>()
				})
			})
			.collect();
		handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
	});

	assert_eq!(ids.len(), 1);
	assert_eq!(registry.minted(), 1);
}

#[test]
fn distinct_live_objects_get_distinct_ids() {
	const PER_THREAD: usize = 200;
	let registry = IdentityRegistry::new();
	let barrier = Barrier::new(THREADS);

	let (objects, ids): (Vec<_>, Vec<_>) = thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|t| {
				let registry = &registry;
				let barrier = &barrier;
				s.spawn(move || {
					let objs: Vec<_> = (0..PER_THREAD).map(|i| Arc::new(t * PER_THREAD + i)).collect();
					barrier.wait();
					let ids: Vec<_> = objs.iter().map(|o| registry.get_or_assign_id(o)).collect();
					(objs, ids)
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).unzip()
	});

	let unique: HashSet<ObjectId> = ids.iter().flatten().copied().collect();
	assert_eq!(unique.len(), THREADS * PER_THREAD);
	assert_eq!(registry.minted(), (THREADS * PER_THREAD) as u64);
	assert_eq!(registry.stats().live, THREADS * PER_THREAD);
	drop(objects);
	assert_eq!(registry.purge(), THREADS * PER_THREAD);
}

#[test]
fn shared_pool_agrees_across_threads() {
	const POOL: usize = 16;
	let registry = IdentityRegistry::new();
	let pool: Vec<_> = (0..POOL).map(|i| Arc::new(i as u64)).collect();
	let barrier = Barrier::new(THREADS);

	let views: Vec<Vec<ObjectId>> = thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|t| {
				let (registry, pool, barrier) = (&registry, &pool, &barrier);
				s.spawn(move || {
					barrier.wait();
					let mut view = vec![None; POOL];
					for step in 0..POOL * 4 {
						let i = (step * 7 + t) % POOL;
						let id = registry.get_or_assign_id(&pool[i]);
						assert_eq!(*view[i].get_or_insert(id), id);
					}
					view.into_iter().map(|id| id.expect("every slot visited")).collect()
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	for view in &views[1..] {
		assert_eq!(view, &views[0]);
	}
	let unique: HashSet<_> = views[0].iter().collect();
	assert_eq!(unique.len(), POOL);
	assert_eq!(registry.minted(), POOL as u64);
}

#[test]
fn concurrent_churn_stays_bounded() {
	const THRESHOLD: usize = 64;
	let registry = IdentityRegistry::with_options(RegistryOptions {
		sweep_threshold: THRESHOLD,
		..Default::default()
	})
	.unwrap();

	thread::scope(|s| {
		for t in 0..8u32 {
			let registry = &registry;
			s.spawn(move || {
				for i in 0..2000u32 {
					let obj = Arc::new((t, i));
					registry.get_or_assign_id(&obj);
					assert!(registry.len() <= THRESHOLD);
				}
			});
		}
	});

	let stats = registry.stats();
	assert_eq!(stats.minted, 8 * 2000);
	assert!(stats.entries <= THRESHOLD);
	assert_eq!(stats.reclaimed + stats.entries as u64, stats.minted);
}
