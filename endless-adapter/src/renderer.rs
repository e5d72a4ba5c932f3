use endless::LogicalIndex;

/// Produces content for a logical index.
///
/// Any `FnMut(LogicalIndex) -> C` is a renderer without a measuring function. Use [`measured`] to
/// attach one.
pub trait ItemRenderer {
    type Content;

    fn render(&mut self, index: LogicalIndex) -> Self::Content;

    /// Main-axis extent of `index` given the container's cross-axis size.
    ///
    /// `None` falls back to the engine's fixed extent, then to the container's own main size.
    fn measured_extent(&self, index: LogicalIndex, cross: f64) -> Option<f64> {
        let _ = (index, cross);
        None
    }
}

impl<F, C> ItemRenderer for F
where
    F: FnMut(LogicalIndex) -> C,
{
    type Content = C;

    fn render(&mut self, index: LogicalIndex) -> C {
        self(index)
    }
}

/// A renderer paired with a measuring function.
#[derive(Clone, Debug)]
pub struct Measured<R, M> {
    renderer: R,
    measure: M,
}

pub fn measured<R, M>(renderer: R, measure: M) -> Measured<R, M>
where
    R: ItemRenderer,
    M: Fn(LogicalIndex, f64) -> f64,
{
    Measured { renderer, measure }
}

impl<R, M> Measured<R, M> {
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R, M> ItemRenderer for Measured<R, M>
where
    R: ItemRenderer,
    M: Fn(LogicalIndex, f64) -> f64,
{
    type Content = R::Content;

    fn render(&mut self, index: LogicalIndex) -> Self::Content {
        self.renderer.render(index)
    }

    fn measured_extent(&self, index: LogicalIndex, cross: f64) -> Option<f64> {
        Some((self.measure)(index, cross))
    }
}
