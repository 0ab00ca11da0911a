//! Converters that open files as channels.

use crate::kind::Shape;
use crate::registry::ConversionRegistry;
use crate::value::Value;
use tokio::fs::{File, OpenOptions};

pub(crate) fn register(registry: &mut ConversionRegistry) {
  registry.register(Shape::File, Shape::ReadableChannel, |value, _options| async move {
    let path = value.into_file_path()?;
    let file = File::open(&path).await?;
    Ok(Value::readable_channel(file))
  });

  registry.register(Shape::File, Shape::WritableChannel, |value, options| async move {
    let path = value.into_file_path()?;
    let mut open = OpenOptions::new();
    open.write(true).create(true);
    if options.append() {
      open.append(true);
    } else {
      open.truncate(true);
    }
    let file = open.open(&path).await?;
    Ok(Value::writable_channel(file))
  });
}
