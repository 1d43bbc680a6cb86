mod destroy;
mod fixtures;
mod show;
