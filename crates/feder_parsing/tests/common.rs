/// A program touching every declaration and control flow construct
pub const SHAPES: &str = "\
// shapes and their areas
namespace shapes
  trait Shape
    Func area : float;
  ;

  class Square :: Shape
    side : float
    func Square(s : float)
      side = s
    ;
    func area : float
      side * side
    ;
  ;
;

enum{T} Option
  Some(T)
  None
;

func describe(o : Option{int}) : int
  match o
    Option.Some(v) => v;
    _ => 0;
  ;
;

total := 0
for i := 0; i < 10; i++
  if i % 2 == 0
    total += i
  ;
;
";
