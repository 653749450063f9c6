use super::source::Source;

/// Joins sources with a `\n` between each of them.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  pub fn join(&self) -> String {
    let size_hint = self.inner.iter().map(|source| source.content().len() + 1).sum::<usize>();

    let mut ret_source = String::with_capacity(size_hint);
    for (index, source) in self.inner.iter().enumerate() {
      if index > 0 {
        ret_source.push('\n');
      }
      ret_source.push_str(source.content());
    }

    ret_source
  }
}

#[test]
fn test_source_joiner() {
  let mut joiner = SourceJoiner::default();
  assert_eq!(joiner.join(), "");
  joiner.append_source("banner");
  joiner.append_source(String::from("body"));
  assert_eq!(joiner.join(), "banner\nbody");
}
