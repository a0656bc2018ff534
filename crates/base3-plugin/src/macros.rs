//! Convenience macros for sub-plugin development.

/// Registers one class for several capabilities at once.
///
/// `$construct` is a function (or capture-free closure) taking the
/// container and returning `AppResult<Arc<$class>>`. It is called once per
/// capability on every discovery query.
///
/// # Example
/// ```rust,ignore
/// register_class!(
///     &mut builder,
///     app: "reports",
///     class: ReportPlugin => [dyn Plugin, dyn HookListener],
///     ReportPlugin::build
/// );
/// ```
#[macro_export]
macro_rules! register_class {
    (
        $builder:expr,
        app: $app:expr,
        class: $class:ident => [$($cap:ty),+ $(,)?],
        $construct:expr
    ) => {{
        let builder: &mut $crate::prelude::ClassTableBuilder = $builder;
        $(
            builder.register::<$cap, _>(
                $app,
                stringify!($class),
                |c: &$crate::prelude::Container| {
                    let construct = $construct;
                    construct(c).map(|object: ::std::sync::Arc<$class>| object as ::std::sync::Arc<$cap>)
                },
            );
        )+
        builder
    }};
}
