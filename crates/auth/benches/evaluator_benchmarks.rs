use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use labyrinth_auth::{AccessRequirement, AuthUser, NavItem, Permission, PermissionEvaluator, Role, visible_items};
use labyrinth_core::UserId;

/// A user with `roles` roles granting `per_role` permissions each, half of them shared.
fn user_with(roles: u64, per_role: u64) -> AuthUser {
    let mut user = AuthUser::new(UserId::new("usr-1"), "bench@example.com");
    for r in 0..roles {
        let mut role = Role::new(r, format!("role-{r}"));
        for p in 0..per_role {
            let name = if p % 2 == 0 {
                format!("shared:{p}")
            } else {
                format!("role-{r}:{p}")
            };
            role = role.with_permission(Permission::new(r * per_role + p, name));
        }
        user = user.with_role(role);
    }
    user
}

fn bench_can(c: &mut Criterion) {
    let mut group = c.benchmark_group("can");

    for &(roles, per_role) in &[(1u64, 5u64), (5, 20), (20, 50)] {
        let user = user_with(roles, per_role);
        let all = AccessRequirement::new()
            .roles(["role-0", "missing"])
            .permissions(["shared:0", "role-0:1"]);
        let any = all.clone().any();

        group.bench_with_input(BenchmarkId::new("require_all", roles * per_role), &user, |b, user| {
            b.iter(|| PermissionEvaluator::for_user(black_box(user)).can(black_box(&all)))
        });
        group.bench_with_input(BenchmarkId::new("require_any", roles * per_role), &user, |b, user| {
            b.iter(|| PermissionEvaluator::for_user(black_box(user)).can(black_box(&any)))
        });
    }

    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let user = user_with(5, 20);
    let menu: Vec<NavItem> = (0..50)
        .map(|i| {
            NavItem::new(format!("Item {i}"), format!("/item/{i}"), "list")
                .with_permissions([format!("shared:{}", i % 40)])
                .with_children(vec![NavItem::new("Child", format!("/item/{i}/child"), "list")])
        })
        .collect();

    c.bench_function("visible_items/50", |b| {
        b.iter(|| visible_items(black_box(&menu), &PermissionEvaluator::for_user(&user)))
    });
}

criterion_group!(benches, bench_can, bench_navigation);
criterion_main!(benches);
