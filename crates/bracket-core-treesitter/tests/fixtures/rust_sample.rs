// A comment with an unbalanced bracket: (
fn main() {
    let s = "not a bracket: [";
    let c = '}';
    let v = vec![(1, 2)];
    /* ) */
    println!("{:?}", v);
}
